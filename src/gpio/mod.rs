//! # GPIO module
//!
//! The type-level design of this module follows the
//! [ATSAMD HAL implementation](https://docs.rs/atsamd-hal/0.13.0/atsamd_hal/gpio/v2/index.html):
//! pins and ports are zero-sized types whose identity lives entirely in the
//! type system.
//!
//! The API is split into three submodules:
//!
//! - [`pins`]: single input and output pins, [`InputPin<N>`] and
//!   [`OutputPin<N>`], addressed by logical pin number
//! - [`ports`]: contiguous bit ranges of one port, [`InputPort`] and
//!   [`OutputPort`]
//! - [`dynpins`]: value-level versions of the single pins, for storing
//!   different pins in one collection
//!
//! The type-level API is strongly preferred. By representing each pin within
//! the type system, unwired pin numbers and invalid bit ranges are compile
//! errors, and every access has absolutely zero run-time cost.
//!
//! ## Interrupt safety
//!
//! Single-bit writes to ports in the low I/O space are single `sbi`/`cbi`
//! instructions. Everything else that needs a read-modify-write of a register
//! shared with other pins runs inside [`critical_section::with`], which saves
//! and restores the previous interrupt state.

pub mod dynpins;
pub use dynpins::*;

pub mod pins;
pub use pins::*;

pub mod ports;
pub use ports::*;

mod reg;
pub use reg::Reg;

/// Logic level "low", as accepted by [`OutputPin::new`] and returned by reads
pub const LOW: bool = false;
/// Logic level "high"
pub const HIGH: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    Low = 0,
    High = 1,
}

impl From<bool> for PinState {
    #[inline]
    fn from(level: bool) -> Self {
        if level {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

impl From<PinState> for bool {
    #[inline]
    fn from(state: PinState) -> Self {
        state == PinState::High
    }
}
