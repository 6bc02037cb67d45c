//! # Fast digital I/O for 8-bit AVR microcontrollers
//!
//! Pins are named by their logical (Arduino style) number and bound to their
//! `DDRx`/`PORTx`/`PINx` registers at compile time. Every accessor is
//! zero-sized and compiles down to direct register accesses.
//!
//! ```
//! use avr_fastio::prelude::*;
//!
//! let mut led = OutputPin::<13>::new(LOW);
//! let button = InputPin::<2>::new(true);
//! if !button.read() {
//!     led.toggle();
//! }
//! ```
//!
//! The board is selected with exactly one Cargo feature: `arduino-uno`
//! (default), `arduino-mega2560` or `sanguino`.
//!
//! The `sim` feature replaces the register accesses with the host model in
//! the `sim` module and installs its [`critical_section`] implementation.
//! It is meant for the crate's own tests and for testing firmware logic on a
//! host. That implementation only masks the simulated interrupts of the
//! calling thread and must not be combined with another one. Without `sim`, the crate uses
//! whatever implementation the application links, `avr-device` on AVR.
#![no_std]

#[cfg(any(test, feature = "sim"))]
extern crate std;

#[cfg(all(feature = "sim", target_arch = "avr"))]
compile_error!("The `sim` feature models the I/O space on a host and cannot be used on AVR.");

#[cfg(not(any(
    feature = "arduino-uno",
    feature = "arduino-mega2560",
    feature = "sanguino"
)))]
compile_error!(
    "This crate requires you to select your target board as a feature.

    Please select exactly one of the following

    * arduino-uno (ATmega328P: Uno, Nano, Duemilanove, Mini, Pro, ...)
    * arduino-mega2560
    * sanguino (ATmega644P / ATmega1284P)
    "
);

#[cfg(any(
    all(feature = "arduino-uno", feature = "arduino-mega2560"),
    all(feature = "arduino-uno", feature = "sanguino"),
    all(feature = "arduino-mega2560", feature = "sanguino"),
))]
compile_error!(
    "More than one board feature is selected. If you select a board other than \
     `arduino-uno`, disable the default features."
);

/// Compile the items only when exactly one board is selected, so a bad
/// selection reports nothing but the messages above
macro_rules! with_board {
    ($($item:item)*) => {
        $(
            #[cfg(any(
                all(
                    feature = "arduino-uno",
                    not(feature = "arduino-mega2560"),
                    not(feature = "sanguino")
                ),
                all(
                    feature = "arduino-mega2560",
                    not(feature = "arduino-uno"),
                    not(feature = "sanguino")
                ),
                all(
                    feature = "sanguino",
                    not(feature = "arduino-uno"),
                    not(feature = "arduino-mega2560")
                ),
            ))]
            $item
        )*
    };
}

with_board! {
    pub mod board;
    pub mod gpio;
    pub mod prelude;
    #[cfg(any(test, feature = "sim"))]
    pub mod sim;

    pub use gpio::{PinState, HIGH, LOW};
}

pub mod typelevel;

mod private {
    /// Super trait used to mark traits with an exhaustive set of
    /// implementations
    pub trait Sealed {}
}

pub(crate) use private::Sealed;
