//! Instruction decoding and dispatch.

use super::{
    super::opcodes::{self as op, Opcode},
    Engine, HintError, HintErrorKind, OpResult, Program,
};

/// Maximum size of a program in bytes.
pub const MAX_INSTRUCTIONS: usize = 50_000;

/// Maximum number of instructions executed in a single run. This ensures
/// termination of programs that loop.
pub const MAX_STEPS: usize = 100_000;

impl<'a> Engine<'a> {
    /// Resets state for the specified program and executes all of its
    /// instructions.
    pub fn run_program(&mut self, program: Program) -> Result<(), HintError> {
        self.program.reset(program);
        self.value_stack.clear();
        self.run()
    }

    /// Executes instructions until the end of the initial program or an
    /// error.
    pub fn run(&mut self) -> Result<(), HintError> {
        if self.program.code().len() > MAX_INSTRUCTIONS {
            return Err(self.error(0, None, HintErrorKind::TooManyInstructions));
        }
        let mut steps = 0;
        while self.program.pc < self.program.range.end {
            let pc = self.program.pc;
            let Some(&opcode) = self.program.code().get(pc) else {
                break;
            };
            steps += 1;
            if steps >= MAX_STEPS {
                return Err(self.error(pc, Some(opcode), HintErrorKind::ExceededExecutionBudget));
            }
            let program = self.program.current;
            self.dispatch(pc, opcode).map_err(|kind| HintError {
                program,
                glyph_id: self.glyph_id,
                pc,
                opcode: Some(opcode),
                kind,
            })?;
        }
        Ok(())
    }

    fn error(&self, pc: usize, opcode: Option<Opcode>, kind: HintErrorKind) -> HintError {
        HintError {
            program: self.program.current,
            glyph_id: self.glyph_id,
            pc,
            opcode,
            kind,
        }
    }

    /// Executes the instruction at `pc`.
    ///
    /// The program counter is advanced past the opcode before execution so
    /// instructions that transfer control or consume inline data overwrite
    /// it.
    pub(super) fn dispatch(&mut self, pc: usize, opcode: Opcode) -> OpResult {
        if self.value_stack.len() < op::pop_count(opcode) {
            return Err(HintErrorKind::ValueStackUnderflow);
        }
        self.program.pc = pc + 1;
        match opcode {
            op::SVTCA0..=op::SFVTCA1 => self.op_svtca(opcode),
            op::SPVTL0..=op::SFVTL1 => self.op_svtl(opcode),
            op::SPVFS => self.op_spvfs(),
            op::SFVFS => self.op_sfvfs(),
            op::GPV => self.op_gpv(),
            op::GFV => self.op_gfv(),
            op::SFVTPV => self.op_sfvtpv(),
            op::ISECT => self.op_isect(),
            op::SRP0 | op::SRP1 | op::SRP2 => self.op_srp(opcode),
            op::SZP0 | op::SZP1 | op::SZP2 => self.op_szp(opcode),
            op::SZPS => self.op_szps(),
            op::SLOOP => self.op_sloop(),
            op::RTG => self.op_rtg(),
            op::RTHG => self.op_rthg(),
            op::SMD => self.op_smd(),
            op::ELSE => self.op_else(pc),
            op::JMPR => self.op_jmpr(pc),
            op::SCVTCI => self.op_scvtci(),
            op::SSWCI => self.op_sswci(),
            op::SSW => self.op_ssw(),
            op::DUP => self.value_stack.dup(),
            op::POP => self.value_stack.pop().map(|_| ()),
            op::CLEAR => {
                self.value_stack.clear();
                Ok(())
            }
            op::SWAP => self.value_stack.swap(),
            op::DEPTH => self.op_depth(),
            op::CINDEX => self.value_stack.copy_index(),
            op::MINDEX => self.value_stack.move_index(),
            op::ALIGNPTS => self.op_alignpts(),
            op::UTP => self.op_utp(),
            op::LOOPCALL => self.op_loopcall(),
            op::CALL => self.op_call(),
            op::FDEF => self.op_fdef(pc),
            op::ENDF => self.op_endf(),
            op::MDAP0 | op::MDAP1 => self.op_mdap(opcode),
            op::IUP0 | op::IUP1 => self.op_iup(opcode),
            op::SHP0 | op::SHP1 => self.op_shp(opcode),
            op::SHC0 | op::SHC1 => self.op_shc(opcode),
            op::SHZ0 | op::SHZ1 => self.op_shz(opcode),
            op::SHPIX => self.op_shpix(),
            op::IP => self.op_ip(),
            op::MSIRP0 | op::MSIRP1 => self.op_msirp(opcode),
            op::ALIGNRP => self.op_alignrp(),
            op::RTDG => self.op_rtdg(),
            op::MIAP0 | op::MIAP1 => self.op_miap(opcode),
            op::NPUSHB | op::NPUSHW => self.op_push(pc, opcode),
            op::WS => self.op_ws(),
            op::RS => self.op_rs(),
            op::WCVTP => self.op_wcvt(false),
            op::RCVT => self.op_rcvt(),
            op::GC0 | op::GC1 => self.op_gc(opcode),
            op::SCFS => self.op_scfs(),
            op::MD0 | op::MD1 => self.op_md(opcode),
            op::MPPEM | op::MPS => self.op_mppem(),
            op::FLIPON => self.op_flipon(),
            op::FLIPOFF => self.op_flipoff(),
            op::DEBUG => self.op_debug(),
            op::LT..=op::NEQ | op::AND | op::OR | op::ADD..=op::MUL | op::MAX | op::MIN => {
                self.op_binary(opcode)
            }
            op::NOT | op::ABS..=op::CEILING => self.op_unary(opcode),
            op::ODD | op::EVEN => self.op_parity(opcode),
            op::IF => self.op_if(pc),
            op::EIF => Ok(()),
            op::DELTAP1 | op::DELTAP2 | op::DELTAP3 => self.op_deltap(opcode),
            op::SDB => self.op_sdb(),
            op::SDS => self.op_sds(),
            op::ROUND00..=op::ROUND11 => self.op_round(),
            op::NROUND00..=op::NROUND11 => self.op_nround(),
            op::WCVTF => self.op_wcvt(true),
            op::DELTAC1 | op::DELTAC2 | op::DELTAC3 => self.op_deltac(opcode),
            op::SROUND => self.op_sround(),
            op::S45ROUND => self.op_s45round(),
            op::JROT => self.op_jrot(pc),
            op::JROF => self.op_jrof(pc),
            op::ROFF => self.op_roff(),
            op::RUTG => self.op_rutg(),
            op::RDTG => self.op_rdtg(),
            op::SANGW | op::AA | op::SCANCTRL | op::SCANTYPE => self.op_ignored(1),
            op::FLIPPT => self.op_flippt(),
            op::FLIPRGON => self.op_fliprgon(),
            op::FLIPRGOFF => self.op_fliprgoff(),
            op::SDPVTL0 | op::SDPVTL1 => self.op_sdpvtl(opcode),
            op::GETINFO => self.op_getinfo(),
            op::IDEF => Err(HintErrorKind::UnsupportedInstructionDefinition),
            op::ROLL => self.value_stack.roll(),
            op::INSTCTRL => self.op_ignored(2),
            op::PUSHB000..=op::PUSHB111 | op::PUSHW000..=op::PUSHW111 => {
                self.op_push(pc, opcode)
            }
            op::MDRP00000..=op::MDRP11111 => self.op_mdrp(opcode),
            op::MIRP00000..=op::MIRP11111 => self.op_mirp(opcode),
            _ => Err(HintErrorKind::UnrecognizedOpcode(opcode)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::{super::opcodes as op, MockEngine},
        HintErrorKind, Program, MAX_INSTRUCTIONS,
    };

    #[test]
    fn underflow_mutates_nothing() {
        let mut mock = MockEngine::new();
        // PUSHB[0] 5, ADD
        let code = [op::PUSHB000, 5, op::ADD];
        let mut engine = mock.engine_for(Program::Font, &code);
        let err = engine.run_program(Program::Font).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::ValueStackUnderflow);
        assert_eq!(err.pc, 2);
        assert_eq!(err.opcode, Some(op::ADD));
        assert_eq!(engine.stack(), &[5]);
    }

    #[test]
    fn unrecognized_opcode() {
        let mut mock = MockEngine::new();
        let code = [op::PUSHB000, 1, 0x28];
        let mut engine = mock.engine_for(Program::ControlValue, &code);
        let err = engine.run_program(Program::ControlValue).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::UnrecognizedOpcode(0x28));
        assert_eq!(err.to_string(), "prep@2:??: unrecognized instruction opcode 0x28");
    }

    #[test]
    fn too_many_instructions() {
        let mut mock = MockEngine::new();
        let code = vec![op::EIF; MAX_INSTRUCTIONS + 1];
        let mut engine = mock.engine_for(Program::Font, &code);
        let err = engine.run_program(Program::Font).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::TooManyInstructions);
        assert_eq!(err.opcode, None);
    }

    #[test]
    fn infinite_loop_terminates() {
        let mut mock = MockEngine::new();
        // PUSHW[0] -3, JMPR: jumps back to the push.
        let code = [op::PUSHW000, 0xFF, 0xFD, op::JMPR];
        let mut engine = mock.engine_for(Program::Font, &code);
        let err = engine.run_program(Program::Font).unwrap_err();
        assert_eq!(err.kind, HintErrorKind::ExceededExecutionBudget);
    }

    #[test]
    fn idef_is_unsupported() {
        let mut mock = MockEngine::new();
        let code = [op::PUSHB000, 0, op::IDEF];
        let mut engine = mock.engine_for(Program::Font, &code);
        let err = engine.run_program(Program::Font).unwrap_err();
        assert!(err.kind.is_unsupported());
    }
}
