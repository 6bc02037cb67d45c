//! # Type-erased, value-level module for single pins
//!
//! Although the type-level API is generally preferred, it is not suitable in
//! all cases. Because each pin is represented by a distinct type, it is not
//! possible to store multiple pins in a homogeneous data structure. The
//! value-level API solves this problem by storing the [`PinBinding`] at
//! run-time.
//!
//! Value-level pins can only be created from their type-level equivalents
//! using [`From`]/[`Into`], so every binding was still resolved at compile
//! time and no operation is fallible.
//!
//! ```
//! use avr_fastio::gpio::{DynOutputPin, OutputPin};
//!
//! let mut segments: [DynOutputPin; 3] = [
//!     OutputPin::<2>::default().into(),
//!     OutputPin::<3>::default().into(),
//!     OutputPin::<7>::default().into(),
//! ];
//! for segment in segments.iter_mut() {
//!     segment.set();
//! }
//! ```
//!
//! Each value-level pin occupies the memory of its binding, and every access
//! goes through it at run-time. Without a constant register address, a
//! single-bit write cannot be one `sbi`/`cbi` instruction, so writes run in a
//! critical section.

use super::pins::{Digital, InputPin, OutputPin, PinBinding, PinId};
use super::reg::RegisterInterface;
use super::PinState;
use core::convert::Infallible;
use embedded_hal::digital::v2 as hal;

//==================================================================================================
//  DynInputPin
//==================================================================================================

/// A value-level input pin
#[derive(Debug)]
pub struct DynInputPin {
    binding: PinBinding,
}

unsafe impl RegisterInterface for DynInputPin {
    #[inline]
    fn binding(&self) -> PinBinding {
        self.binding
    }
}

impl DynInputPin {
    #[inline]
    pub fn id(&self) -> PinBinding {
        self.binding
    }

    #[inline]
    pub fn read(&self) -> bool {
        self.read_pin()
    }

    #[inline]
    pub fn is_high(&self) -> bool {
        self.read_pin()
    }

    #[inline]
    pub fn is_low(&self) -> bool {
        !self.read_pin()
    }
}

impl<const N: u8> From<InputPin<N>> for DynInputPin
where
    Digital<N>: PinId,
{
    #[inline]
    fn from(_pin: InputPin<N>) -> Self {
        DynInputPin {
            binding: <Digital<N> as PinId>::BINDING,
        }
    }
}

impl hal::InputPin for DynInputPin {
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
//  DynOutputPin
//==================================================================================================

/// A value-level output pin
#[derive(Debug)]
pub struct DynOutputPin {
    binding: PinBinding,
}

unsafe impl RegisterInterface for DynOutputPin {
    #[inline]
    fn binding(&self) -> PinBinding {
        self.binding
    }
}

impl DynOutputPin {
    #[inline]
    pub fn id(&self) -> PinBinding {
        self.binding
    }

    #[inline]
    pub fn write(&mut self, value: bool) {
        self.write_pin_protected(value)
    }

    #[inline]
    pub fn set_state(&mut self, state: PinState) {
        self.write_pin_protected(state.into())
    }

    #[inline]
    pub fn set(&mut self) {
        self.write_pin_protected(true)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.write_pin_protected(false)
    }

    #[inline]
    pub fn toggle(&mut self) {
        RegisterInterface::toggle(self)
    }

    #[inline]
    pub fn read(&self) -> bool {
        self.read_pin()
    }

    #[inline]
    pub fn is_set_high(&self) -> bool {
        RegisterInterface::read_latch(self)
    }

    #[inline]
    pub fn is_set_low(&self) -> bool {
        !RegisterInterface::read_latch(self)
    }
}

impl<const N: u8> From<OutputPin<N>> for DynOutputPin
where
    Digital<N>: PinId,
{
    #[inline]
    fn from(_pin: OutputPin<N>) -> Self {
        DynOutputPin {
            binding: <Digital<N> as PinId>::BINDING,
        }
    }
}

impl hal::OutputPin for DynOutputPin {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write_pin_protected(true);
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write_pin_protected(false);
        Ok(())
    }
}

impl hal::StatefulOutputPin for DynOutputPin {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(RegisterInterface::read_latch(self))
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(!RegisterInterface::read_latch(self))
    }
}

impl hal::ToggleableOutputPin for DynOutputPin {
    type Error = Infallible;

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        RegisterInterface::toggle(self);
        Ok(())
    }
}
