//! GP1294AI command set.

/// Controller instructions. Payload shapes are fixed by the hardware, see [`Instruction::payload_len`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Instruction {
    /// Frame Sync (08h)
    FrameSync = 0x08,
    /// Enter Standby (61h) - Power-saving mode
    EnterStandby = 0x61,
    /// Exit Standby (6Dh)
    ExitStandby = 0x6D,
    /// Oscillator Setting (78h) - 1 byte
    OscillatorSetting = 0x78,
    /// Display Mode (80h) - 1 byte
    DisplayMode = 0x80,
    /// Dimming / Brightness (A0h) - 16-bit little-endian level
    Brightness = 0xA0,
    /// Software Reset (AAh)
    Reset = 0xAA,
    /// Display Offset (C0h) - x, y
    DisplayOffset = 0xC0,
    /// VFD Mode Setting (CCh) - 7 configuration bytes
    VfdMode = 0xCC,
    /// Write GRAM (F0h) - x, y header followed by the full GRAM image
    WriteGram = 0xF0,
}

impl Instruction {
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Number of payload bytes `send_command` accepts for this instruction.
    ///
    /// `None` for [`Instruction::WriteGram`], which only goes out through `write_gram`.
    pub const fn payload_len(self) -> Option<usize> {
        match self {
            Instruction::Reset
            | Instruction::FrameSync
            | Instruction::EnterStandby
            | Instruction::ExitStandby => Some(0),
            Instruction::DisplayMode | Instruction::OscillatorSetting => Some(1),
            Instruction::Brightness | Instruction::DisplayOffset => Some(2),
            Instruction::VfdMode => Some(VFD_MODE_CONFIG.len()),
            Instruction::WriteGram => None,
        }
    }
}

/// Longest fixed payload in the command table.
pub const MAX_PAYLOAD_LEN: usize = 7;

/// Payload of [`Instruction::VfdMode`].
pub const VFD_MODE_CONFIG: [u8; MAX_PAYLOAD_LEN] = [0x01, 0x1F, 0x00, 0xFF, 0x3F, 0x00, 0x20];

/// Payload of [`Instruction::OscillatorSetting`].
pub const OSCILLATOR_CONFIG: u8 = 0x08;

/// Vertical display offset matching the panel mounting (shifts the image up by 8 rows).
pub const DISPLAY_OFFSET_Y: u8 = 0x38;
