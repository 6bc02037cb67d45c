//! # Compile-time checks on const generic parameters
//!
//! Port accessors are parameterized by a start bit and a width. Invalid
//! combinations must never reach the hardware, so they are rejected while the
//! accessor is monomorphized: [`BitRange::MASK`] is a constant whose evaluation
//! panics for a bad range, and every port method refers to it.
//!
//! ```compile_fail
//! use avr_fastio::board::PortB;
//! use avr_fastio::gpio::OutputPort;
//!
//! // Bits 6..10 do not fit into an 8-bit port
//! let port = OutputPort::<PortB, 6, 4>::new();
//! ```
//!
//! ```compile_fail
//! use avr_fastio::board::PortB;
//! use avr_fastio::gpio::InputPort;
//!
//! let port = InputPort::<PortB, 0, 0>::new(true);
//! ```

/// Contiguous range of `WIDTH` bits starting at bit `START` of an 8-bit port
pub struct BitRange<const START: u8, const WIDTH: u8>;

impl<const START: u8, const WIDTH: u8> BitRange<START, WIDTH> {
    /// Bits covered by the range. Evaluating it fails the build if
    /// `WIDTH == 0` or `START + WIDTH > 8`.
    pub const MASK: u8 = {
        assert!(WIDTH >= 1, "a port must span at least one bit");
        assert!(
            START as u16 + WIDTH as u16 <= 8,
            "start bit plus width exceeds the 8-bit port"
        );
        (((1u16 << WIDTH) - 1) << START) as u8
    };
}
