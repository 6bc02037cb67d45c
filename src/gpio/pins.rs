//! # Type-level module for single pins
//!
//! Every logical pin number `N` is a distinct type, [`Digital<N>`]. The board
//! table implements [`PinId`] for exactly the numbers that exist on the
//! selected board, binding each to its [`PinBinding`] as an associated
//! constant. [`InputPin<N>`] and [`OutputPin<N>`] are zero-sized; all of their
//! methods compile to direct accesses of the bound registers.
//!
//! ```
//! use avr_fastio::gpio::{InputPin, OutputPin};
//! use avr_fastio::LOW;
//!
//! let mut led = OutputPin::<13>::new(LOW);
//! led.set();
//! led.toggle();
//! assert!(!led.read());
//!
//! let button = InputPin::<2>::pull_up();
//! assert!(button.read());
//! ```
//!
//! A number without a table entry does not compile:
//!
//! ```compile_fail
//! use avr_fastio::gpio::OutputPin;
//!
//! let mut led = OutputPin::<200>::new(false);
//! ```
//!
//! # Absent pins
//!
//! Drivers often take optional pins. [`NO_PIN`] names "no pin connected": an
//! [`OutputPin<NO_PIN>`] has the same API as a real one, but every operation
//! is a no-op and reads return [`LOW`]. The selection happens through the
//! [`OutputPinOps`] trait, so code written against an output pin compiles to
//! nothing for an absent one.
//!
//! ```
//! use avr_fastio::gpio::{OutputPin, OutputPinOps, NO_PIN};
//!
//! struct Display<const RESET: u8> {
//!     reset: OutputPin<RESET>,
//! }
//!
//! impl<const RESET: u8> Display<RESET>
//! where
//!     avr_fastio::gpio::Digital<RESET>: OutputPinOps,
//! {
//!     fn reset(&mut self) {
//!         self.reset.clear();
//!         self.reset.set();
//!     }
//! }
//!
//! let mut wired = Display::<8> { reset: OutputPin::new(true) };
//! wired.reset();
//! let mut unwired = Display::<NO_PIN> { reset: OutputPin::new(true) };
//! unwired.reset();
//! ```
//!
//! # Embedded HAL traits
//!
//! The pins implement the embedded HAL `v2` digital traits with
//! `Error = Infallible`: [`InputPin`](hal::InputPin) for inputs and
//! [`OutputPin`](hal::OutputPin), [`StatefulOutputPin`](hal::StatefulOutputPin),
//! [`ToggleableOutputPin`](hal::ToggleableOutputPin) and
//! [`InputPin`](hal::InputPin) for outputs.
//!
//! [`LOW`]: super::LOW

use super::ports::PortRegisters;
use super::reg::RegisterInterface;
use super::{PinState, LOW};
use crate::Sealed;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2 as hal;

//==================================================================================================
//  Pin bindings and IDs
//==================================================================================================

/// Logical identifier reserved for "no pin connected"
pub const NO_PIN: u8 = 255;

/// Port registers and bit position of one physical pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinBinding {
    pub regs: PortRegisters,
    pub bit: u8,
}

impl PinBinding {
    pub const fn new(regs: PortRegisters, bit: u8) -> Self {
        assert!(bit < 8, "bit offset outside of the 8-bit port");
        PinBinding { regs, bit }
    }
}

/// Logical pin `N`, in the board's numbering
pub enum Digital<const N: u8> {}

impl<const N: u8> Sealed for Digital<N> {}

/// Type-level enum for the pins of the selected board
///
/// Implemented by the board table for every [`Digital<N>`] wired on the board.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no entry in the selected board's pin table",
    label = "pin number not wired on this board"
)]
pub trait PinId: Sealed {
    const BINDING: PinBinding;
}

/// Pin type for an absent pin
pub type NoPin = OutputPin<NO_PIN>;

//==================================================================================================
//  InputPin
//==================================================================================================

/// A digital input, bound to logical pin `N` at compile time
pub struct InputPin<const N: u8> {
    id: PhantomData<Digital<N>>,
}

unsafe impl<const N: u8> RegisterInterface for InputPin<N>
where
    Digital<N>: PinId,
{
    #[inline(always)]
    fn binding(&self) -> PinBinding {
        <Digital<N> as PinId>::BINDING
    }
}

impl<const N: u8> InputPin<N>
where
    Digital<N>: PinId,
{
    /// Configure the pin as input, with or without its pull-up resistor
    #[inline(always)]
    pub fn new(pull_up: bool) -> Self {
        let mut pin = InputPin { id: PhantomData };
        pin.set_dir(false);
        pin.write_pin(pull_up);
        pin
    }

    #[inline(always)]
    pub fn pull_up() -> Self {
        Self::new(true)
    }

    #[inline(always)]
    pub fn floating() -> Self {
        Self::new(false)
    }

    /// The logic level at the pin
    #[inline(always)]
    pub fn read(&self) -> bool {
        self.read_pin()
    }

    #[inline(always)]
    pub fn is_high(&self) -> bool {
        self.read_pin()
    }

    #[inline(always)]
    pub fn is_low(&self) -> bool {
        !self.read_pin()
    }

    /// The [`PinBinding`] this pin was resolved to
    #[inline(always)]
    pub const fn binding() -> PinBinding {
        <Digital<N> as PinId>::BINDING
    }
}

impl<const N: u8> Default for InputPin<N>
where
    Digital<N>: PinId,
{
    fn default() -> Self {
        Self::new(true)
    }
}

impl<const N: u8> hal::InputPin for InputPin<N>
where
    Digital<N>: PinId,
{
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.read_pin())
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.read_pin())
    }
}

//==================================================================================================
//  Output operations
//==================================================================================================

/// Register operations behind an [`OutputPin`]
///
/// There are exactly two implementations: every wired [`Digital<N>`], which
/// accesses the bound registers, and `Digital<NO_PIN>`, which does nothing.
/// Generic code can require `Digital<N>: OutputPinOps` to accept both.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is neither a pin of the selected board nor `NO_PIN`",
    label = "pin number not wired on this board"
)]
pub trait OutputPinOps: Sealed {
    #[doc(hidden)]
    fn make_output(initial: bool);
    #[doc(hidden)]
    fn write(value: bool);
    #[doc(hidden)]
    fn toggle();
    #[doc(hidden)]
    fn read() -> bool;
    #[doc(hidden)]
    fn read_latch() -> bool;
}

/// Register access for a wired pin
struct Registers<const N: u8> {
    id: PhantomData<Digital<N>>,
}

// [`Registers`] only exists inside the calls of [`OutputPinOps`], which are
// reached through an [`OutputPin`] for the same pin
unsafe impl<const N: u8> RegisterInterface for Registers<N>
where
    Digital<N>: PinId,
{
    #[inline(always)]
    fn binding(&self) -> PinBinding {
        <Digital<N> as PinId>::BINDING
    }
}

impl<const N: u8> Registers<N> {
    #[inline(always)]
    fn new() -> Self {
        Registers { id: PhantomData }
    }
}

impl<const N: u8> OutputPinOps for Digital<N>
where
    Digital<N>: PinId,
{
    #[inline(always)]
    fn make_output(initial: bool) {
        let mut regs = Registers::<N>::new();
        regs.set_dir(true);
        regs.write_pin(initial);
    }

    #[inline(always)]
    fn write(value: bool) {
        Registers::<N>::new().write_pin(value)
    }

    #[inline(always)]
    fn toggle() {
        RegisterInterface::toggle(&mut Registers::<N>::new())
    }

    #[inline(always)]
    fn read() -> bool {
        Registers::<N>::new().read_pin()
    }

    #[inline(always)]
    fn read_latch() -> bool {
        RegisterInterface::read_latch(&Registers::<N>::new())
    }
}

impl OutputPinOps for Digital<NO_PIN> {
    #[inline(always)]
    fn make_output(_initial: bool) {}

    #[inline(always)]
    fn write(_value: bool) {}

    #[inline(always)]
    fn toggle() {}

    #[inline(always)]
    fn read() -> bool {
        LOW
    }

    #[inline(always)]
    fn read_latch() -> bool {
        LOW
    }
}

//==================================================================================================
//  OutputPin
//==================================================================================================

/// A digital output, bound to logical pin `N` at compile time
///
/// `N` may be [`NO_PIN`], see the [module documentation](self).
pub struct OutputPin<const N: u8> {
    id: PhantomData<Digital<N>>,
}

impl<const N: u8> OutputPin<N>
where
    Digital<N>: OutputPinOps,
{
    /// Configure the pin as output and drive `initial`
    #[inline(always)]
    pub fn new(initial: bool) -> Self {
        <Digital<N>>::make_output(initial);
        OutputPin { id: PhantomData }
    }

    #[inline(always)]
    pub fn write(&mut self, value: bool) {
        <Digital<N>>::write(value)
    }

    #[inline(always)]
    pub fn set_state(&mut self, state: PinState) {
        self.write(state.into())
    }

    /// Drive the pin high
    #[inline(always)]
    pub fn set(&mut self) {
        self.write(true)
    }

    /// Drive the pin low
    #[inline(always)]
    pub fn clear(&mut self) {
        self.write(false)
    }

    /// Invert the output level
    #[inline(always)]
    pub fn toggle(&mut self) {
        <Digital<N>>::toggle()
    }

    /// The logic level at the pin. It differs from the last written level
    /// when external circuitry overdrives the output.
    #[inline(always)]
    pub fn read(&self) -> bool {
        <Digital<N>>::read()
    }

    /// The level last written to the output latch
    #[inline(always)]
    pub fn is_set_high(&self) -> bool {
        <Digital<N>>::read_latch()
    }

    #[inline(always)]
    pub fn is_set_low(&self) -> bool {
        !<Digital<N>>::read_latch()
    }
}

impl<const N: u8> Default for OutputPin<N>
where
    Digital<N>: OutputPinOps,
{
    fn default() -> Self {
        Self::new(LOW)
    }
}

impl<const N: u8> hal::OutputPin for OutputPin<N>
where
    Digital<N>: OutputPinOps,
{
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set();
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.clear();
        Ok(())
    }
}

impl<const N: u8> hal::StatefulOutputPin for OutputPin<N>
where
    Digital<N>: OutputPinOps,
{
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(OutputPin::is_set_high(self))
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(OutputPin::is_set_low(self))
    }
}

impl<const N: u8> hal::ToggleableOutputPin for OutputPin<N>
where
    Digital<N>: OutputPinOps,
{
    type Error = Infallible;

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        OutputPin::toggle(self);
        Ok(())
    }
}

impl<const N: u8> hal::InputPin for OutputPin<N>
where
    Digital<N>: OutputPinOps,
{
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.read())
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.read())
    }
}
