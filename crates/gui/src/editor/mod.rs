//! An open recording: view state, interaction and pitch analysis.

pub mod pitch_panel;
pub mod timeline;
pub mod waveform_painter;

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use sonoview_core::audio::io::read_wav;
use sonoview_core::audio::SpectrumAnalyser;
use sonoview_core::config::Settings;
use sonoview_core::pitch::{PitchBinTable, PitchMapper};
use sonoview_core::view::{InteractionController, Selection, Update, ViewEvent, ViewState, Viewport};
use sonoview_core::SampleBuffer;

/// Latest selection as reported by the controller.
pub type SelectionCell = Rc<Cell<Option<Selection>>>;

pub struct Session {
    pub path: PathBuf,
    pub view: ViewState,
    controller: InteractionController,
    analyser: SpectrumAnalyser,
    mapper: PitchMapper,
    /// Sample under the pointer this frame.
    pub hovered_sample: Option<usize>,
}

impl Session {
    pub fn open(path: &Path, settings: &Settings, selection: SelectionCell) -> Result<Self> {
        let buffer = read_wav(path)?;
        let mut session = Self::new(buffer, settings, selection)?;
        session.path = path.to_path_buf();
        Ok(session)
    }

    pub fn new(buffer: SampleBuffer, settings: &Settings, selection: SelectionCell) -> Result<Self> {
        let analyser = settings.analyser.build()?;
        let view = ViewState::new(
            Arc::new(buffer),
            settings.view.clone(),
            Viewport::new(0.0, 0.0),
        );

        selection.set(None);
        let mut controller = InteractionController::new();
        controller.on_selection_change(move |s| selection.set(s));

        Ok(Self {
            path: PathBuf::new(),
            view,
            controller,
            analyser,
            mapper: PitchMapper::new(),
            hovered_sample: None,
        })
    }

    pub fn handle(&mut self, event: ViewEvent) -> Update {
        self.controller.handle(&mut self.view, event)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string())
    }

    /// Sample the pitch display follows: hover, then selection, then view start.
    pub fn focus_sample(&self) -> usize {
        self.hovered_sample
            .or_else(|| self.view.selection().map(|s| s.normalized().start))
            .unwrap_or_else(|| self.view.range().start)
    }

    /// Analyse the window at the focus sample.
    pub fn pitch_table(&mut self) -> PitchBinTable {
        let position = self.focus_sample();
        let frame = self.analyser.analyse(self.view.buffer(), position);
        self.mapper.map(&frame.magnitudes_db, frame.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(cell: &SelectionCell) -> Session {
        let buffer = SampleBuffer::new(vec![vec![0.0; 10_000]], 8000).unwrap();
        let mut s = Session::new(buffer, &Settings::default(), cell.clone()).unwrap();
        s.handle(ViewEvent::Resize {
            width: 1000.0,
            height: 100.0,
        });
        s
    }

    #[test]
    fn test_selection_cell_follows_controller() {
        let cell: SelectionCell = Rc::new(Cell::new(Some(Selection::new(1, 2))));
        let mut s = session(&cell);
        assert_eq!(cell.get(), None);

        s.handle(ViewEvent::PointerPress { x: 100.0, y: 0.0 });
        s.handle(ViewEvent::PointerMove { x: 300.0, y: 0.0 });
        assert_eq!(cell.get(), Some(Selection::new(1000, 3000)));

        s.handle(ViewEvent::ClearSelection);
        assert_eq!(cell.get(), None);
    }

    #[test]
    fn test_focus_sample_priority() {
        let cell: SelectionCell = Rc::new(Cell::new(None));
        let mut s = session(&cell);
        assert_eq!(s.focus_sample(), 0);

        s.view.set_selection(Some(Selection::new(4000, 2500)));
        assert_eq!(s.focus_sample(), 2500);

        s.hovered_sample = Some(7000);
        assert_eq!(s.focus_sample(), 7000);
        assert_eq!(s.pitch_table().total(), 0.0);
    }
}
