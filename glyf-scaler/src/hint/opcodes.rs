//! TrueType instruction opcodes.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions>

/// Type alias for a TrueType opcode.
pub type Opcode = u8;

pub const SVTCA0: Opcode = 0x00;
pub const SVTCA1: Opcode = 0x01;
pub const SPVTCA0: Opcode = 0x02;
pub const SPVTCA1: Opcode = 0x03;
pub const SFVTCA0: Opcode = 0x04;
pub const SFVTCA1: Opcode = 0x05;
pub const SPVTL0: Opcode = 0x06;
pub const SPVTL1: Opcode = 0x07;
pub const SFVTL0: Opcode = 0x08;
pub const SFVTL1: Opcode = 0x09;
pub const SPVFS: Opcode = 0x0A;
pub const SFVFS: Opcode = 0x0B;
pub const GPV: Opcode = 0x0C;
pub const GFV: Opcode = 0x0D;
pub const SFVTPV: Opcode = 0x0E;
pub const ISECT: Opcode = 0x0F;
pub const SRP0: Opcode = 0x10;
pub const SRP1: Opcode = 0x11;
pub const SRP2: Opcode = 0x12;
pub const SZP0: Opcode = 0x13;
pub const SZP1: Opcode = 0x14;
pub const SZP2: Opcode = 0x15;
pub const SZPS: Opcode = 0x16;
pub const SLOOP: Opcode = 0x17;
pub const RTG: Opcode = 0x18;
pub const RTHG: Opcode = 0x19;
pub const SMD: Opcode = 0x1A;
pub const ELSE: Opcode = 0x1B;
pub const JMPR: Opcode = 0x1C;
pub const SCVTCI: Opcode = 0x1D;
pub const SSWCI: Opcode = 0x1E;
pub const SSW: Opcode = 0x1F;
pub const DUP: Opcode = 0x20;
pub const POP: Opcode = 0x21;
pub const CLEAR: Opcode = 0x22;
pub const SWAP: Opcode = 0x23;
pub const DEPTH: Opcode = 0x24;
pub const CINDEX: Opcode = 0x25;
pub const MINDEX: Opcode = 0x26;
pub const ALIGNPTS: Opcode = 0x27;
pub const UTP: Opcode = 0x29;
pub const LOOPCALL: Opcode = 0x2A;
pub const CALL: Opcode = 0x2B;
pub const FDEF: Opcode = 0x2C;
pub const ENDF: Opcode = 0x2D;
pub const MDAP0: Opcode = 0x2E;
pub const MDAP1: Opcode = 0x2F;
pub const IUP0: Opcode = 0x30;
pub const IUP1: Opcode = 0x31;
pub const SHP0: Opcode = 0x32;
pub const SHP1: Opcode = 0x33;
pub const SHC0: Opcode = 0x34;
pub const SHC1: Opcode = 0x35;
pub const SHZ0: Opcode = 0x36;
pub const SHZ1: Opcode = 0x37;
pub const SHPIX: Opcode = 0x38;
pub const IP: Opcode = 0x39;
pub const MSIRP0: Opcode = 0x3A;
pub const MSIRP1: Opcode = 0x3B;
pub const ALIGNRP: Opcode = 0x3C;
pub const RTDG: Opcode = 0x3D;
pub const MIAP0: Opcode = 0x3E;
pub const MIAP1: Opcode = 0x3F;
pub const NPUSHB: Opcode = 0x40;
pub const NPUSHW: Opcode = 0x41;
pub const WS: Opcode = 0x42;
pub const RS: Opcode = 0x43;
pub const WCVTP: Opcode = 0x44;
pub const RCVT: Opcode = 0x45;
pub const GC0: Opcode = 0x46;
pub const GC1: Opcode = 0x47;
pub const SCFS: Opcode = 0x48;
pub const MD0: Opcode = 0x49;
pub const MD1: Opcode = 0x4A;
pub const MPPEM: Opcode = 0x4B;
pub const MPS: Opcode = 0x4C;
pub const FLIPON: Opcode = 0x4D;
pub const FLIPOFF: Opcode = 0x4E;
pub const DEBUG: Opcode = 0x4F;
pub const LT: Opcode = 0x50;
pub const LTEQ: Opcode = 0x51;
pub const GT: Opcode = 0x52;
pub const GTEQ: Opcode = 0x53;
pub const EQ: Opcode = 0x54;
pub const NEQ: Opcode = 0x55;
pub const ODD: Opcode = 0x56;
pub const EVEN: Opcode = 0x57;
pub const IF: Opcode = 0x58;
pub const EIF: Opcode = 0x59;
pub const AND: Opcode = 0x5A;
pub const OR: Opcode = 0x5B;
pub const NOT: Opcode = 0x5C;
pub const DELTAP1: Opcode = 0x5D;
pub const SDB: Opcode = 0x5E;
pub const SDS: Opcode = 0x5F;
pub const ADD: Opcode = 0x60;
pub const SUB: Opcode = 0x61;
pub const DIV: Opcode = 0x62;
pub const MUL: Opcode = 0x63;
pub const ABS: Opcode = 0x64;
pub const NEG: Opcode = 0x65;
pub const FLOOR: Opcode = 0x66;
pub const CEILING: Opcode = 0x67;
pub const ROUND00: Opcode = 0x68;
pub const ROUND11: Opcode = 0x6B;
pub const NROUND00: Opcode = 0x6C;
pub const NROUND11: Opcode = 0x6F;
pub const WCVTF: Opcode = 0x70;
pub const DELTAP2: Opcode = 0x71;
pub const DELTAP3: Opcode = 0x72;
pub const DELTAC1: Opcode = 0x73;
pub const DELTAC2: Opcode = 0x74;
pub const DELTAC3: Opcode = 0x75;
pub const SROUND: Opcode = 0x76;
pub const S45ROUND: Opcode = 0x77;
pub const JROT: Opcode = 0x78;
pub const JROF: Opcode = 0x79;
pub const ROFF: Opcode = 0x7A;
pub const RUTG: Opcode = 0x7C;
pub const RDTG: Opcode = 0x7D;
pub const SANGW: Opcode = 0x7E;
pub const AA: Opcode = 0x7F;
pub const FLIPPT: Opcode = 0x80;
pub const FLIPRGON: Opcode = 0x81;
pub const FLIPRGOFF: Opcode = 0x82;
pub const SCANCTRL: Opcode = 0x85;
pub const SDPVTL0: Opcode = 0x86;
pub const SDPVTL1: Opcode = 0x87;
pub const GETINFO: Opcode = 0x88;
pub const IDEF: Opcode = 0x89;
pub const ROLL: Opcode = 0x8A;
pub const MAX: Opcode = 0x8B;
pub const MIN: Opcode = 0x8C;
pub const SCANTYPE: Opcode = 0x8D;
pub const INSTCTRL: Opcode = 0x8E;
pub const PUSHB000: Opcode = 0xB0;
pub const PUSHB111: Opcode = 0xB7;
pub const PUSHW000: Opcode = 0xB8;
pub const PUSHW111: Opcode = 0xBF;
pub const MDRP00000: Opcode = 0xC0;
pub const MDRP11111: Opcode = 0xDF;
pub const MIRP00000: Opcode = 0xE0;
pub const MIRP11111: Opcode = 0xFF;

/// Returns the mnemonic for the given opcode.
///
/// Opcodes that encode flags in their low bits share the name of their
/// family.
pub fn name(opcode: Opcode) -> &'static str {
    match opcode {
        SVTCA0 | SVTCA1 => "SVTCA",
        SPVTCA0 | SPVTCA1 => "SPVTCA",
        SFVTCA0 | SFVTCA1 => "SFVTCA",
        SPVTL0 | SPVTL1 => "SPVTL",
        SFVTL0 | SFVTL1 => "SFVTL",
        SPVFS => "SPVFS",
        SFVFS => "SFVFS",
        GPV => "GPV",
        GFV => "GFV",
        SFVTPV => "SFVTPV",
        ISECT => "ISECT",
        SRP0 => "SRP0",
        SRP1 => "SRP1",
        SRP2 => "SRP2",
        SZP0 => "SZP0",
        SZP1 => "SZP1",
        SZP2 => "SZP2",
        SZPS => "SZPS",
        SLOOP => "SLOOP",
        RTG => "RTG",
        RTHG => "RTHG",
        SMD => "SMD",
        ELSE => "ELSE",
        JMPR => "JMPR",
        SCVTCI => "SCVTCI",
        SSWCI => "SSWCI",
        SSW => "SSW",
        DUP => "DUP",
        POP => "POP",
        CLEAR => "CLEAR",
        SWAP => "SWAP",
        DEPTH => "DEPTH",
        CINDEX => "CINDEX",
        MINDEX => "MINDEX",
        ALIGNPTS => "ALIGNPTS",
        UTP => "UTP",
        LOOPCALL => "LOOPCALL",
        CALL => "CALL",
        FDEF => "FDEF",
        ENDF => "ENDF",
        MDAP0 | MDAP1 => "MDAP",
        IUP0 | IUP1 => "IUP",
        SHP0 | SHP1 => "SHP",
        SHC0 | SHC1 => "SHC",
        SHZ0 | SHZ1 => "SHZ",
        SHPIX => "SHPIX",
        IP => "IP",
        MSIRP0 | MSIRP1 => "MSIRP",
        ALIGNRP => "ALIGNRP",
        RTDG => "RTDG",
        MIAP0 | MIAP1 => "MIAP",
        NPUSHB => "NPUSHB",
        NPUSHW => "NPUSHW",
        WS => "WS",
        RS => "RS",
        WCVTP => "WCVTP",
        RCVT => "RCVT",
        GC0 | GC1 => "GC",
        SCFS => "SCFS",
        MD0 | MD1 => "MD",
        MPPEM => "MPPEM",
        MPS => "MPS",
        FLIPON => "FLIPON",
        FLIPOFF => "FLIPOFF",
        DEBUG => "DEBUG",
        LT => "LT",
        LTEQ => "LTEQ",
        GT => "GT",
        GTEQ => "GTEQ",
        EQ => "EQ",
        NEQ => "NEQ",
        ODD => "ODD",
        EVEN => "EVEN",
        IF => "IF",
        EIF => "EIF",
        AND => "AND",
        OR => "OR",
        NOT => "NOT",
        DELTAP1 => "DELTAP1",
        SDB => "SDB",
        SDS => "SDS",
        ADD => "ADD",
        SUB => "SUB",
        DIV => "DIV",
        MUL => "MUL",
        ABS => "ABS",
        NEG => "NEG",
        FLOOR => "FLOOR",
        CEILING => "CEILING",
        ROUND00..=ROUND11 => "ROUND",
        NROUND00..=NROUND11 => "NROUND",
        WCVTF => "WCVTF",
        DELTAP2 => "DELTAP2",
        DELTAP3 => "DELTAP3",
        DELTAC1 => "DELTAC1",
        DELTAC2 => "DELTAC2",
        DELTAC3 => "DELTAC3",
        SROUND => "SROUND",
        S45ROUND => "S45ROUND",
        JROT => "JROT",
        JROF => "JROF",
        ROFF => "ROFF",
        RUTG => "RUTG",
        RDTG => "RDTG",
        SANGW => "SANGW",
        AA => "AA",
        FLIPPT => "FLIPPT",
        FLIPRGON => "FLIPRGON",
        FLIPRGOFF => "FLIPRGOFF",
        SCANCTRL => "SCANCTRL",
        SDPVTL0 | SDPVTL1 => "SDPVTL",
        GETINFO => "GETINFO",
        IDEF => "IDEF",
        ROLL => "ROLL",
        MAX => "MAX",
        MIN => "MIN",
        SCANTYPE => "SCANTYPE",
        INSTCTRL => "INSTCTRL",
        PUSHB000..=PUSHB111 => "PUSHB",
        PUSHW000..=PUSHW111 => "PUSHW",
        MDRP00000..=MDRP11111 => "MDRP",
        MIRP00000..=MIRP11111 => "MIRP",
        _ => "??",
    }
}

/// Returns the number of stack elements consumed by the given opcode.
///
/// Instructions that consume a variable number of elements (the loop
/// instructions, CINDEX, MINDEX and the delta family) report the fixed
/// portion only and check the remainder themselves.
pub const fn pop_count(opcode: Opcode) -> usize {
    match opcode {
        SPVTL0..=SFVFS => 2,
        ISECT => 5,
        SRP0..=SLOOP => 1,
        SMD | JMPR | SCVTCI | SSWCI | SSW => 1,
        DUP | POP | CINDEX | MINDEX => 1,
        SWAP => 2,
        ALIGNPTS => 2,
        UTP => 1,
        LOOPCALL => 2,
        CALL | FDEF => 1,
        MDAP0 | MDAP1 => 1,
        SHC0 | SHC1 | SHZ0 | SHZ1 | SHPIX => 1,
        MSIRP0 | MSIRP1 | MIAP0 | MIAP1 => 2,
        WS => 2,
        RS => 1,
        WCVTP => 2,
        RCVT | GC0 | GC1 => 1,
        SCFS | MD0 | MD1 => 2,
        DEBUG => 1,
        LT..=NEQ => 2,
        ODD | EVEN | IF => 1,
        AND | OR => 2,
        NOT | DELTAP1 | SDB | SDS => 1,
        ADD..=MUL => 2,
        ABS..=NROUND11 => 1,
        WCVTF => 2,
        DELTAP2..=DELTAC3 => 1,
        SROUND | S45ROUND => 1,
        JROT | JROF => 2,
        SANGW | AA => 1,
        FLIPRGON | FLIPRGOFF => 2,
        SCANCTRL => 1,
        SDPVTL0 | SDPVTL1 => 2,
        GETINFO | IDEF => 1,
        ROLL => 3,
        MAX | MIN => 2,
        SCANTYPE => 1,
        INSTCTRL => 2,
        MDRP00000..=MDRP11111 => 1,
        MIRP00000..=MIRP11111 => 2,
        _ => 0,
    }
}

/// Returns true if the opcode is assigned to an instruction.
pub const fn is_assigned(opcode: Opcode) -> bool {
    !matches!(opcode, 0x28 | 0x7B | 0x83 | 0x84 | 0x8F..=0xAF)
}

/// Returns the position of the instruction that follows the one at `pc`,
/// stepping over any inline push data.
///
/// Returns `None` if the push data extends past the end of the bytecode.
pub fn next_pc(bytecode: &[u8], pc: usize) -> Option<usize> {
    let opcode = *bytecode.get(pc)?;
    let payload = match opcode {
        NPUSHB => 1 + *bytecode.get(pc + 1)? as usize,
        NPUSHW => 1 + 2 * *bytecode.get(pc + 1)? as usize,
        PUSHB000..=PUSHB111 => (opcode - PUSHB000) as usize + 1,
        PUSHW000..=PUSHW111 => 2 * ((opcode - PUSHW000) as usize + 1),
        _ => 0,
    };
    let next = pc + 1 + payload;
    (next <= bytecode.len()).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_names() {
        assert_eq!(name(DIV), "DIV");
        assert_eq!(name(0xC7), "MDRP");
        assert_eq!(name(0xFE), "MIRP");
        assert_eq!(name(0xB3), "PUSHB");
        assert_eq!(name(0x6A), "ROUND");
        assert_eq!(name(0x28), "??");
    }

    #[test]
    fn pop_counts() {
        assert_eq!(pop_count(SVTCA0), 0);
        assert_eq!(pop_count(SPVTL1), 2);
        assert_eq!(pop_count(ISECT), 5);
        assert_eq!(pop_count(SLOOP), 1);
        assert_eq!(pop_count(CLEAR), 0);
        assert_eq!(pop_count(ROLL), 3);
        assert_eq!(pop_count(NROUND11), 1);
        assert_eq!(pop_count(MPPEM), 0);
        assert_eq!(pop_count(0xD5), 1);
        assert_eq!(pop_count(0xE5), 2);
        assert_eq!(pop_count(PUSHW111), 0);
    }

    #[test]
    fn unassigned() {
        let unassigned = (0..=255u8).filter(|op| !is_assigned(*op)).count();
        // 0x28, 0x7B, 0x83, 0x84 and 0x8F..=0xAF
        assert_eq!(unassigned, 4 + 33);
        assert!(!is_assigned(0xA0));
        assert!(is_assigned(IDEF));
    }

    #[test]
    fn skip_push_payloads() {
        #[rustfmt::skip]
        let code = [
            NPUSHB, 2, 1, 2,
            PUSHW000 + 1, 0, 1, 0, 2,
            PUSHB000, 7,
            DUP,
            NPUSHW, 3, 0,
        ];
        assert_eq!(next_pc(&code, 0), Some(4));
        assert_eq!(next_pc(&code, 4), Some(9));
        assert_eq!(next_pc(&code, 9), Some(11));
        assert_eq!(next_pc(&code, 11), Some(12));
        // Truncated payload.
        assert_eq!(next_pc(&code, 12), None);
        assert_eq!(next_pc(&code, code.len()), None);
    }
}
