//! The telecommand agenda: where parsed commands wait for their execution
//! time.
//!
//! [`Agenda::schedule`] is the single handoff point out of the parsing
//! core. The bundled [`SlotAgenda`] is a fixed-slot store with replay
//! protection on the sent-timestamp; [`execute_due`] drains everything
//! whose execution time has arrived and invokes the registered handler.

pub mod error;
pub mod executor;
pub mod slot;

pub use error::AgendaError;
pub use executor::execute_due;
pub use slot::{Agenda, AgendaConfig, SlotAgenda};
