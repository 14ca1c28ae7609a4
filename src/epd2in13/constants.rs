//! Waveform lookup tables, loaded verbatim with `WriteLutRegister`

/// Length of every waveform table the controller accepts
pub(crate) const LUT_LEN: usize = 30;

/// Full refresh waveform, high contrast and a visible flash
#[rustfmt::skip]
pub(crate) const LUT_FULL_UPDATE: [u8; LUT_LEN] = [
    0x22, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x11,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E, 0x1E,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Partial refresh waveform, no flash but lower contrast
#[rustfmt::skip]
pub(crate) const LUT_PARTIAL_UPDATE: [u8; LUT_LEN] = [
    0x18, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x0F, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
