//! App runtime: owns the patch, the sequencer, and the MIDI endpoints, and
//! drives the event loop.
//!
//! Single-threaded and cooperative: one key event or one batch of queued
//! transport events is handled to completion before the next, so the
//! sequencer never observes a half-applied edit.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};

use movement_core::midi::{MidiClockInput, MidiNoteOutput};
use movement_core::{PresetBank, Sequencer};
use movement_types::Patch;

use crate::input::{EditorState, UiMode};
use crate::render::{self, ViewState};
use crate::term::TerminalBackend;

/// Render throttle: never paint more than ~60 times a second.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Idle timeout while waiting for keys; clock events queue meanwhile.
const POLL_TIMEOUT: Duration = Duration::from_millis(2);

pub struct App {
    patch: Patch,
    editor: EditorState,
    sequencer: Sequencer,
    bank: PresetBank,
    clock: MidiClockInput,
    output: MidiNoteOutput,
    render_needed: bool,
    last_render: Instant,
    change_latency: Option<Duration>,
}

impl App {
    pub fn new(bank: PresetBank) -> Self {
        let patch = Patch::new(bank.progression(0));
        Self {
            patch,
            editor: EditorState::new(),
            sequencer: Sequencer::new(),
            bank,
            clock: MidiClockInput::new(),
            output: MidiNoteOutput::new(),
            render_needed: true,
            last_render: Instant::now(),
            change_latency: None,
        }
    }

    /// Wire up MIDI. Virtual ports when asked (unix only); otherwise the
    /// requested or first available ports. A missing clock source is not
    /// fatal — the editor still works, it just won't play.
    pub fn connect_midi(&mut self, port: Option<usize>, virtual_ports: bool) {
        #[cfg(unix)]
        if virtual_ports {
            match self.clock.create_virtual("movement") {
                Ok(()) => info!("virtual clock input 'movement' open"),
                Err(e) => warn!("virtual clock input failed: {}", e),
            }
            match self.output.create_virtual("movement") {
                Ok(()) => info!("virtual note output 'movement' open"),
                Err(e) => warn!("virtual note output failed: {}", e),
            }
            return;
        }
        #[cfg(not(unix))]
        if virtual_ports {
            warn!("virtual ports are only supported on unix; using real ports");
        }

        self.clock.refresh_ports();
        let input_index = port.unwrap_or(0);
        if self.clock.list_ports().is_empty() {
            warn!("no MIDI input ports; transport will stay stopped");
        } else {
            match self.clock.connect(input_index) {
                Ok(()) => info!(
                    "clock from '{}'",
                    self.clock.connected_port_name().unwrap_or("?")
                ),
                Err(e) => warn!("clock connect failed: {}", e),
            }
        }

        let output_index = port.unwrap_or(0);
        if self.output.list_ports().is_empty() {
            warn!("no MIDI output ports; notes go nowhere");
        } else {
            match self.output.connect(output_index) {
                Ok(()) => info!(
                    "notes to '{}'",
                    self.output.connected_port_name().unwrap_or("?")
                ),
                Err(e) => warn!("note output connect failed: {}", e),
            }
        }
    }

    /// Main event loop. Returns once the operator quits; sounding notes
    /// are flushed before returning (shutdown is an implicit stop).
    pub fn run(&mut self, backend: &mut TerminalBackend) -> io::Result<()> {
        loop {
            if let Some(key) = backend.poll_key(POLL_TIMEOUT)? {
                if self.handle_key(key) {
                    break;
                }
            }
            self.drain_transport();
            self.maybe_render(backend)?;
        }
        self.sequencer.stop(&mut self.output);
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') => return true,
            KeyCode::Tab => {
                self.editor.mode = self.editor.mode.toggled();
            }
            KeyCode::Char('h') => match self.editor.mode {
                UiMode::Edit => self.editor.move_step(&self.patch, -1),
                UiMode::Ctl => self.editor.move_control(-1),
            },
            KeyCode::Char('l') => match self.editor.mode {
                UiMode::Edit => self.editor.move_step(&self.patch, 1),
                UiMode::Ctl => self.editor.move_control(1),
            },
            KeyCode::Char('k') => self.editor.adjust(&mut self.patch, &self.bank, 1),
            KeyCode::Char('j') => self.editor.adjust(&mut self.patch, &self.bank, -1),
            KeyCode::Enter => self.editor.activate(&mut self.patch),
            _ => return false,
        }
        self.render_needed = true;
        false
    }

    /// Drain queued clock/transport events into the sequencer. Redraws are
    /// requested only for chord-change ticks, never per pulse.
    fn drain_transport(&mut self) {
        for event in self.clock.poll_events() {
            let started = Instant::now();
            if self
                .sequencer
                .handle_event(event, &self.patch, &mut self.output)
            {
                self.change_latency = Some(started.elapsed());
                self.render_needed = true;
            }
        }
    }

    fn maybe_render(&mut self, backend: &mut TerminalBackend) -> io::Result<()> {
        if !self.render_needed || self.last_render.elapsed() < FRAME_INTERVAL {
            return Ok(());
        }
        self.last_render = Instant::now();
        self.render_needed = false;

        let view = ViewState {
            patch: &self.patch,
            editor: &self.editor,
            bank: &self.bank,
            playing_step: self.sequencer.playing_step(&self.patch.progression),
            running: self.sequencer.is_running(),
            change_latency: self.change_latency,
            clock_port: self.clock.connected_port_name(),
        };
        backend.draw(|frame| render::draw(frame, &view))
    }
}
