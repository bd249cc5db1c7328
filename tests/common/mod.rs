#![allow(dead_code)]

use std::collections::HashMap;

use newtonc::arena::Arena;
use newtonc::code_gen::asm_gen::AsmGen;
use newtonc::lex::lex_all;
use newtonc::parse::parser::Parser;

const STEP_LIMIT: usize = 100_000;

pub fn compile(src: &str) -> String {
    let arena = Arena::default();
    let program = Parser::new(lex_all(src), &arena)
        .parse_all()
        .expect("source should parse");

    AsmGen::new()
        .gen_program(&program)
        .expect("source should generate")
}

/// Compiles `src` and runs the listing, returning the exit status.
pub fn exit_status(src: &str) -> u8 {
    run(&compile(src))
}

/* -------------------------------------------------------------------------- */
/*        a tiny interpreter for the instruction subset the generator emits   */
/* -------------------------------------------------------------------------- */

enum Operand {
    Reg(String),
    Imm(u64),
    // `[rsp + n]`, n in bytes
    Stack(usize),
}

fn operand(text: &str) -> Operand {
    let text = text.trim().trim_start_matches("QWORD").trim();
    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        let offset = inner
            .split('+')
            .nth(1)
            .map(|n| n.trim().parse().expect("stack offset"))
            .unwrap_or(0);
        Operand::Stack(offset)
    }
    else if let Ok(imm) = text.parse::<u64>() {
        Operand::Imm(imm)
    }
    else {
        Operand::Reg(text.to_string())
    }
}

struct Machine {
    regs: HashMap<String, u64>,
    stack: Vec<u64>,
    zero_flag: bool,
}

impl Machine {
    fn reg(&self, name: &str) -> u64 {
        *self.regs.get(name).unwrap_or(&0)
    }

    fn slot(&mut self, offset: usize) -> &mut u64 {
        assert_eq!(offset % 8, 0, "misaligned stack access");
        let len = self.stack.len();
        let index = len.checked_sub(offset / 8 + 1).expect("stack access below rsp bounds");
        &mut self.stack[index]
    }

    fn read(&mut self, op: &Operand) -> u64 {
        match op {
            Operand::Reg(r) => self.reg(r),
            Operand::Imm(v) => *v,
            Operand::Stack(offset) => *self.slot(*offset),
        }
    }

    fn write(&mut self, op: &Operand, value: u64) {
        match op {
            Operand::Reg(r) => { self.regs.insert(r.clone(), value); }
            Operand::Imm(_) => panic!("cannot write to an immediate"),
            Operand::Stack(offset) => *self.slot(*offset) = value,
        }
    }
}

/// Executes a listing until the exit syscall and returns the status byte.
pub fn run(asm: &str) -> u8 {
    let lines: Vec<&str> = asm
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("global"))
        .collect();

    let labels: HashMap<&str, usize> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| line.strip_suffix(':').map(|label| (label, i)))
        .collect();

    let mut m = Machine { regs: HashMap::new(), stack: Vec::new(), zero_flag: false };
    let mut pc = 0;

    for _ in 0..STEP_LIMIT {
        let line = *lines.get(pc).expect("execution ran past the end of the listing");
        pc += 1;

        if line.ends_with(':') {
            continue;
        }

        let (mnemonic, rest) = line.split_once(' ').unwrap_or((line, ""));
        let args: Vec<Operand> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(", ").map(operand).collect()
        };

        match mnemonic {
            "mov" => {
                let v = m.read(&args[1]);
                m.write(&args[0], v);
            }
            "push" => {
                let v = m.read(&args[0]);
                m.stack.push(v);
            }
            "pop" => {
                let v = m.stack.pop().expect("pop from an empty stack");
                m.write(&args[0], v);
            }
            "add" => {
                if matches!(&args[0], Operand::Reg(r) if r == "rsp") {
                    let Operand::Imm(bytes) = args[1] else { panic!("rsp adjusted by a register") };
                    let new_len = m.stack.len() - bytes as usize / 8;
                    m.stack.truncate(new_len);
                } else {
                    let v = m.read(&args[0]).wrapping_add(m.read(&args[1]));
                    m.write(&args[0], v);
                }
            }
            "sub" => {
                let v = m.read(&args[0]).wrapping_sub(m.read(&args[1]));
                m.write(&args[0], v);
            }
            "xor" => {
                let v = m.read(&args[0]) ^ m.read(&args[1]);
                m.write(&args[0], v);
            }
            "mul" => {
                let product = m.reg("rax") as u128 * m.read(&args[0]) as u128;
                m.regs.insert("rax".into(), product as u64);
                m.regs.insert("rdx".into(), (product >> 64) as u64);
            }
            "div" => {
                let divisor = m.read(&args[0]) as u128;
                assert_ne!(divisor, 0, "division by zero");
                let dividend = ((m.reg("rdx") as u128) << 64) | m.reg("rax") as u128;
                m.regs.insert("rax".into(), (dividend / divisor) as u64);
                m.regs.insert("rdx".into(), (dividend % divisor) as u64);
            }
            "test" => {
                m.zero_flag = m.read(&args[0]) & m.read(&args[1]) == 0;
            }
            "jz" | "jmp" => {
                if mnemonic == "jmp" || m.zero_flag {
                    pc = labels[rest];
                }
            }
            "syscall" => {
                assert_eq!(m.reg("rax"), 60, "only the exit syscall is emitted");
                return m.reg("rdi") as u8;
            }
            other => panic!("unexpected instruction {other:?}"),
        }
    }

    panic!("program did not exit within {STEP_LIMIT} steps");
}
