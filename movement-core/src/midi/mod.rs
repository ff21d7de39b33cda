//! MIDI glue: external clock/transport in, chord notes out.
//!
//! The sequencer never sees raw bytes. Inbound real-time messages are
//! parsed here into [`TransportEvent`]s and handed over through a channel;
//! outbound notes are translated to wire bytes only at the output
//! connection.

use log::{debug, warn};
use midir::{MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use std::sync::mpsc::{self, Receiver};

use movement_types::NoteName;

use crate::sequencer::NoteSink;

const CLIENT_NAME: &str = "movement";

/// Transport-level event, abstracted from the MIDI real-time bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// Clock pulse, 24 per quarter note
    Pulse,
    Start,
    Continue,
    Stop,
}

/// Parse a raw MIDI message into a transport event. Everything that is not
/// a real-time clock/transport byte is ignored.
pub fn parse_realtime_message(data: &[u8]) -> Option<TransportEvent> {
    match data.first()? {
        0xF8 => Some(TransportEvent::Pulse),
        0xFA => Some(TransportEvent::Start),
        0xFB => Some(TransportEvent::Continue),
        0xFC => Some(TransportEvent::Stop),
        _ => None,
    }
}

/// Information about an available MIDI port
#[derive(Debug, Clone)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

/// Manages the external clock source: port enumeration, connection, and a
/// non-blocking event queue filled from the midir callback.
pub struct MidiClockInput {
    midi_in: Option<MidiInput>,
    connection: Option<MidiInputConnection<()>>,
    event_receiver: Option<Receiver<TransportEvent>>,
    connected_port_name: Option<String>,
    available_ports: Vec<MidiPortInfo>,
}

impl MidiClockInput {
    pub fn new() -> Self {
        let midi_in = MidiInput::new(CLIENT_NAME).ok();
        Self {
            midi_in,
            connection: None,
            event_receiver: None,
            connected_port_name: None,
            available_ports: Vec::new(),
        }
    }

    /// Refresh the list of available MIDI input ports
    pub fn refresh_ports(&mut self) {
        self.available_ports.clear();

        if let Some(ref midi_in) = self.midi_in {
            let ports = midi_in.ports();
            for (index, port) in ports.iter().enumerate() {
                if let Ok(name) = midi_in.port_name(port) {
                    self.available_ports.push(MidiPortInfo { index, name });
                }
            }
        }
    }

    pub fn list_ports(&self) -> &[MidiPortInfo] {
        &self.available_ports
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    /// Connect to a MIDI input port by index
    pub fn connect(&mut self, port_index: usize) -> Result<(), String> {
        self.disconnect();

        // Connecting consumes the MidiInput, so build a fresh one
        let midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| e.to_string())?;
        let ports = midi_in.ports();

        if port_index >= ports.len() {
            return Err(format!("Invalid port index: {}", port_index));
        }

        let port = &ports[port_index];
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let (tx, rx) = mpsc::channel();
        self.event_receiver = Some(rx);

        let connection = midi_in
            .connect(
                port,
                "movement-clock",
                move |_timestamp, message, _| {
                    if let Some(event) = parse_realtime_message(message) {
                        let _ = tx.send(event);
                    }
                },
                (),
            )
            .map_err(|e| e.to_string())?;

        self.connection = Some(connection);
        self.connected_port_name = Some(port_name);
        self.midi_in = MidiInput::new(CLIENT_NAME).ok();

        Ok(())
    }

    /// Expose a virtual input port other software can send clock to,
    /// as the original hardware setup does.
    #[cfg(unix)]
    pub fn create_virtual(&mut self, name: &str) -> Result<(), String> {
        use midir::os::unix::VirtualInput;

        self.disconnect();

        let midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| e.to_string())?;
        let (tx, rx) = mpsc::channel();
        self.event_receiver = Some(rx);

        let connection = midi_in
            .create_virtual(
                name,
                move |_timestamp, message, _| {
                    if let Some(event) = parse_realtime_message(message) {
                        let _ = tx.send(event);
                    }
                },
                (),
            )
            .map_err(|e| e.to_string())?;

        self.connection = Some(connection);
        self.connected_port_name = Some(name.to_string());
        self.midi_in = MidiInput::new(CLIENT_NAME).ok();

        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
        }
        self.event_receiver = None;
        self.connected_port_name = None;
    }

    /// Drain pending transport events (non-blocking)
    pub fn poll_events(&self) -> Vec<TransportEvent> {
        let mut events = Vec::new();
        if let Some(ref rx) = self.event_receiver {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        events
    }
}

impl Default for MidiClockInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiClockInput {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// MIDI note output. Implements [`NoteSink`]; this is the only place that
/// knows note-on is `0x90 | channel` on the wire.
pub struct MidiNoteOutput {
    connection: Option<MidiOutputConnection>,
    connected_port_name: Option<String>,
}

impl MidiNoteOutput {
    pub fn new() -> Self {
        Self {
            connection: None,
            connected_port_name: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    /// List available output port names
    pub fn list_ports(&self) -> Vec<MidiPortInfo> {
        let mut ports_info = Vec::new();
        if let Ok(midi_out) = MidiOutput::new(CLIENT_NAME) {
            for (index, port) in midi_out.ports().iter().enumerate() {
                if let Ok(name) = midi_out.port_name(port) {
                    ports_info.push(MidiPortInfo { index, name });
                }
            }
        }
        ports_info
    }

    /// Connect to a MIDI output port by index
    pub fn connect(&mut self, port_index: usize) -> Result<(), String> {
        self.disconnect();

        let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| e.to_string())?;
        let ports = midi_out.ports();

        if port_index >= ports.len() {
            return Err(format!("Invalid port index: {}", port_index));
        }

        let port = &ports[port_index];
        let port_name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let connection = midi_out
            .connect(port, "movement-notes")
            .map_err(|e| e.to_string())?;

        self.connection = Some(connection);
        self.connected_port_name = Some(port_name);
        Ok(())
    }

    /// Expose a virtual output port other software can read notes from.
    #[cfg(unix)]
    pub fn create_virtual(&mut self, name: &str) -> Result<(), String> {
        use midir::os::unix::VirtualOutput;

        self.disconnect();

        let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| e.to_string())?;
        let connection = midi_out.create_virtual(name).map_err(|e| e.to_string())?;

        self.connection = Some(connection);
        self.connected_port_name = Some(name.to_string());
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
        }
        self.connected_port_name = None;
    }

    fn send(&mut self, bytes: [u8; 3]) {
        if let Some(ref mut conn) = self.connection {
            // Best effort: the sequencer's bookkeeping must not depend on
            // delivery, or a failed send would wedge later note-offs
            if let Err(e) = conn.send(&bytes) {
                warn!("midi send failed: {}", e);
            }
        }
    }
}

impl NoteSink for MidiNoteOutput {
    fn note_on(&mut self, note: NoteName, velocity: u8, channel: u8) {
        match note.midi() {
            Some(key) => self.send([0x90 | (channel & 0x0F), key, velocity.min(127)]),
            None => debug!("note {} outside MIDI range, skipped", note),
        }
    }

    fn note_off(&mut self, note: NoteName, channel: u8) {
        match note.midi() {
            Some(key) => self.send([0x80 | (channel & 0x0F), key, 0]),
            None => debug!("note {} outside MIDI range, skipped", note),
        }
    }
}

impl Default for MidiNoteOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiNoteOutput {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_pulse() {
        assert_eq!(parse_realtime_message(&[0xF8]), Some(TransportEvent::Pulse));
    }

    #[test]
    fn test_parse_start_continue_stop() {
        assert_eq!(parse_realtime_message(&[0xFA]), Some(TransportEvent::Start));
        assert_eq!(
            parse_realtime_message(&[0xFB]),
            Some(TransportEvent::Continue)
        );
        assert_eq!(parse_realtime_message(&[0xFC]), Some(TransportEvent::Stop));
    }

    #[test]
    fn test_parse_empty_returns_none() {
        assert!(parse_realtime_message(&[]).is_none());
    }

    #[test]
    fn test_parse_channel_messages_ignored() {
        assert!(parse_realtime_message(&[0x90, 60, 100]).is_none());
        assert!(parse_realtime_message(&[0x80, 60, 0]).is_none());
        assert!(parse_realtime_message(&[0xB0, 1, 64]).is_none());
    }

    #[test]
    fn test_parse_other_realtime_ignored() {
        // Active sensing, song position, sysex
        assert!(parse_realtime_message(&[0xFE]).is_none());
        assert!(parse_realtime_message(&[0xF2, 0, 0]).is_none());
        assert!(parse_realtime_message(&[0xF0, 0x01, 0xF7]).is_none());
    }
}
