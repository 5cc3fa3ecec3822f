use chip8_vm::emulator::instruction::{assemble, Addr, Const, Instruction, Reg};
use chip8_vm::emulator::machine::FONT;
use chip8_vm::emulator::{Emulator, Fault, RunState};
use pretty_assertions::assert_eq;

fn load(program: &[Instruction]) -> Emulator {
    let mut emulator = Emulator::with_seed(1);
    emulator.load_game(&assemble(program)).unwrap();
    emulator
}

#[test]
fn fresh_emulator_matches_reset_state() {
    let emulator = Emulator::with_seed(1);
    let state = emulator.state();
    assert_eq!(0x200, state.pc());
    assert_eq!(0, state.index());
    assert_eq!(0, state.sp());
    assert!((0..16).all(|n| state.register(n) == 0));
    assert_eq!((0, 0), (state.delay_timer(), state.sound_timer()));
    assert_eq!(&FONT[..], &state.memory()[..80]);
    assert!(state.memory()[80..].iter().all(|b| *b == 0));
    assert_eq!(0, emulator.snapshot().count_lit());
}

#[test]
fn draws_a_font_glyph() {
    // Draw the glyph for 0 at (2, 3)
    let mut emulator = load(&[
        Instruction::SetRegToConst(Reg(0), Const(0)),
        Instruction::SetIToSpriteAddrVx(Reg(0)),
        Instruction::SetRegToConst(Reg(1), Const(2)),
        Instruction::SetRegToConst(Reg(2), Const(3)),
        Instruction::Draw(Reg(1), Reg(2), Const(5)),
    ]);
    for _ in 0..5 {
        emulator.step().unwrap();
    }

    let frame = emulator.take_frame().unwrap();
    let glyph: Vec<String> = frame
        .to_string()
        .lines()
        .skip(3)
        .take(5)
        .map(|line| line[2..6].to_string())
        .collect();
    assert_eq!(vec!["####", "#  #", "#  #", "#  #", "####"], glyph);
    assert_eq!(0, emulator.state().register(0xF));
}

#[test]
fn counting_loop_terminates() {
    // V0 counts to 10, then falls into a self jump
    let mut emulator = load(&[
        Instruction::IncRegByConst(Reg(0), Const(1)), // 0x200
        Instruction::IfRegEqConst(Reg(0), Const(10)), // 0x202
        Instruction::Goto(Addr(0x200)),               // 0x204
        Instruction::Goto(Addr(0x206)),               // 0x206
    ]);
    for _ in 0..100 {
        emulator.step().unwrap();
    }
    assert_eq!(10, emulator.state().register(0));
    assert_eq!(0x206, emulator.state().pc());
}

#[test]
fn await_key_then_continue() {
    let mut emulator = load(&[
        Instruction::SetRegToGetKey(Reg(3)),
        Instruction::SetRegToReg(Reg(4), Reg(3)),
    ]);
    emulator.step().unwrap();
    emulator.step().unwrap();
    assert_eq!(&RunState::AwaitingKey(Reg(3)), emulator.run_state());
    assert_eq!(0x200, emulator.state().pc());

    emulator.keypad().set_key(0xC, true);
    emulator.step().unwrap();
    emulator.step().unwrap();
    assert_eq!(0xC, emulator.state().register(4));
    assert_eq!(0x204, emulator.state().pc());
}

#[test]
fn reset_then_reload_recovers_from_fault() {
    let mut emulator = Emulator::with_seed(1);
    emulator.load_game(&[0x00, 0xEE]).unwrap();
    assert_eq!(Err(Fault::StackUnderflow { pc: 0x200 }), emulator.step());

    emulator.reset();
    emulator.load_game(&assemble(&[Instruction::SetRegToConst(Reg(1), Const(9))])).unwrap();
    emulator.step().unwrap();
    assert_eq!(9, emulator.state().register(1));
}

#[test]
fn sessions_are_independent() {
    let mut a = load(&[Instruction::SetRegToConst(Reg(0), Const(1))]);
    let b = load(&[Instruction::SetRegToConst(Reg(0), Const(2))]);
    a.step().unwrap();
    a.keypad().set_key(1, true);
    assert_eq!(1, a.state().register(0));
    assert_eq!(0, b.state().register(0));
    assert_eq!(0x200, b.state().pc());
}
