//! Intcode virtual machine.
//!
//! A `VM` runs until it has something to say: an output word, a request for
//! input, or a halt. The caller decides what happens next, which is what lets
//! several machines be wired together (see [`network`]).

pub mod network;

use {
    log::{debug, trace},
    thiserror::Error,
};

pub type Word = i64;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid opcode {opcode} at {ip}")]
    BadOpcode { opcode: Word, ip: u64 },

    #[error("bad parameter mode {mode} at {ip}")]
    BadMode { mode: Word, ip: u64 },

    #[error("instruction at {ip} writes to an immediate operand")]
    ImmediateDestination { ip: u64 },

    #[error("negative address {0}")]
    NegativeAddress(Word),

    #[error("relative address {base}{offset:+} out of range")]
    AddressOverflow { base: Word, offset: Word },

    #[error("arithmetic overflow at {ip}")]
    Overflow { ip: u64 },

    #[error("not ready for input")]
    NotWaitingForInput,

    #[error("input not supplied")]
    InputNotSupplied,

    #[error("ran out of input")]
    InputExhausted,

    #[error("expected {expected}, got {got:?}")]
    UnexpectedResult { expected: &'static str, got: VMResult },

    #[error("every machine is blocked on input")]
    Deadlock,

    #[error("no machine {index} in a network of {len}")]
    NoSuchMachine { index: usize, len: usize },

    #[error("parsing intcode word {word:?}")]
    Parse {
        word: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MemRef {
    Abs(Word),
    Rel(Word)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operand {
    Mem(MemRef),
    Imm(Word)
}

impl Operand {
    fn decode(word: Word, iword: Word, ip: u64) -> Result<(Operand, Word), Error> {
        use Operand::*;
        let mode = iword % 10;
        let operand = match mode {
            0 => Mem(MemRef::Abs(word)),
            1 => Imm(word),
            2 => Mem(MemRef::Rel(word)),
            _ => return Err(Error::BadMode { mode, ip }),
        };

        Ok((operand, iword / 10))
    }

    fn decode_dest(word: Word, iword: Word, ip: u64) -> Result<(MemRef, Word), Error> {
        match Operand::decode(word, iword, ip)? {
            (Operand::Mem(dest), rest) => Ok((dest, rest)),
            (Operand::Imm(_),    _   ) => Err(Error::ImmediateDestination { ip }),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum OpXXM {
    Add, // ADD
    Mul, // MULtiply
    Les, // LESs than
    Equ, // EQUal to
}

#[derive(Clone, Copy, Debug)]
enum OpXX {
    JiT, // Jump If True
    JiF, // Jump If False
}

#[derive(Clone, Copy, Debug)]
enum OpX {
    Out, // OUTput
    ARB, // Adjust Relative Base
}

// Operand shapes: X source, M memory destination.
#[derive(Clone, Copy, Debug)]
enum Instruction {
    XXM(OpXXM, Operand, Operand, MemRef),
    XX(OpXX, Operand, Operand),
    Inp(MemRef),
    X(OpX, Operand),
    Halt,
}

impl Instruction {
    fn decode(stream: [Word; 4], ip: u64) -> Result<(Instruction, u64), Error> {
        use Instruction::*;

        let iword = stream[0];
        let (opcode, iword) = (iword % 100, iword / 100);

        let inst = match opcode {
            1 | 2 | 7 | 8 => {
                let (s1, iword) = Operand::decode(stream[1], iword, ip)?;
                let (s2, iword) = Operand::decode(stream[2], iword, ip)?;
                let (d,  _    ) = Operand::decode_dest(stream[3], iword, ip)?;
                use OpXXM::*;
                let op = match opcode {
                    1 => Add,
                    2 => Mul,
                    7 => Les,
                    8 => Equ,
                    _ => unreachable!()
                };
                (XXM(op, s1, s2, d), 4)
            }

            5 | 6 => {
                let (x1, iword) = Operand::decode(stream[1], iword, ip)?;
                let (x2, _    ) = Operand::decode(stream[2], iword, ip)?;
                let op = if opcode == 5 { OpXX::JiT } else { OpXX::JiF };
                (XX(op, x1, x2), 3)
            }

            3 => {
                let (d, _) = Operand::decode_dest(stream[1], iword, ip)?;
                (Inp(d), 2)
            }

            4 | 9 => {
                let (x, _) = Operand::decode(stream[1], iword, ip)?;
                let op = if opcode == 4 { OpX::Out } else { OpX::ARB };
                (X(op, x), 2)
            }

            99 => (Halt, 1),

            _ => return Err(Error::BadOpcode { opcode, ip }),
        };

        Ok(inst)
    }
}

#[derive(Clone, Copy, Debug)]
enum VMState {
    Running { ip: u64 },
    WaitInput { dest: MemRef, resume_ip: u64 },
    Stopped
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VMResult {
    Stopped,
    WaitInput,
    Output(Word)
}

impl VMResult {
    pub fn expect_output(self) -> Result<Word, Error> {
        match self {
            VMResult::Output(word) => Ok(word),
            got => Err(Error::UnexpectedResult { expected: "output", got }),
        }
    }

    pub fn expect_wait_input(self) -> Result<(), Error> {
        match self {
            VMResult::WaitInput => Ok(()),
            got => Err(Error::UnexpectedResult { expected: "input request", got }),
        }
    }
}

/// A machine plus its memory. Cloning takes a full save state.
#[derive(Clone, Debug)]
pub struct VM {
    state: VMState,
    rel_base: Word,
    memory: Vec<Word>,
    steps: u64,
}

impl VM {
    pub fn new(memory: Vec<Word>) -> VM {
        VM { state: VMState::Running { ip: 0 }, rel_base: 0, memory, steps: 0 }
    }

    pub fn feed_input(&mut self, input: Word) -> Result<(), Error> {
        if let VMState::WaitInput { dest, resume_ip } = self.state {
            *self.mem_mut(dest)? = input;
            self.state = VMState::Running { ip: resume_ip };
            Ok(())
        }
        else {
            Err(Error::NotWaitingForInput)
        }
    }

    /// Runs until the next output, input request or halt.
    pub fn run(&mut self) -> Result<VMResult, Error> {
        loop {
            if let Some(output) = self.step()? {
                return Ok(VMResult::Output(output));
            }

            match self.state {
                VMState::Running   {..} => { continue; }
                VMState::WaitInput {..} => {
                    debug!("waiting for input after {} steps", self.steps);
                    return Ok(VMResult::WaitInput);
                }
                VMState::Stopped        => {
                    debug!("halted after {} steps", self.steps);
                    return Ok(VMResult::Stopped);
                }
            }
        }
    }

    /// Feeds `input` as requested and collects output, until the machine halts
    /// or asks for more input than was given. Returns the outputs and whichever
    /// of `Stopped` or `WaitInput` ended the run.
    pub fn run_with_input(&mut self, input: impl IntoIterator<Item = Word>)
        -> Result<(Vec<Word>, VMResult), Error>
    {
        let mut input = input.into_iter();
        let mut output = Vec::new();

        if self.waiting() {
            match input.next() {
                Some(word) => self.feed_input(word)?,
                None       => return Ok((output, VMResult::WaitInput)),
            }
        }

        loop {
            match self.run()? {
                VMResult::Output(out) => { output.push(out); }
                VMResult::WaitInput   => match input.next() {
                    Some(word) => self.feed_input(word)?,
                    None       => return Ok((output, VMResult::WaitInput)),
                },
                VMResult::Stopped     => return Ok((output, VMResult::Stopped)),
            }
        }
    }

    pub fn waiting(&self) -> bool {
        matches!(self.state, VMState::WaitInput {..})
    }

    pub fn stopped(&self) -> bool {
        matches!(self.state, VMState::Stopped)
    }

    pub fn dump_memory(&self) -> Vec<Word> {
        self.memory.clone()
    }

    pub fn peek(&self, addr: usize) -> Word {
        self.memory.get(addr).copied().unwrap_or(0)
    }

    pub fn poke(&mut self, addr: usize, value: Word) {
        if addr >= self.memory.len() {
            self.memory.resize(addr + 1, 0);
        }
        self.memory[addr] = value;
    }

    fn resolve(&self, ptr: MemRef) -> Result<usize, Error> {
        let addr = match ptr {
            MemRef::Abs(p) => p,
            MemRef::Rel(o) => self.rel_base.checked_add(o)
                .ok_or(Error::AddressOverflow { base: self.rel_base, offset: o })?,
        };
        usize::try_from(addr).map_err(|_| Error::NegativeAddress(addr))
    }

    fn mem_mut(&mut self, ptr: MemRef) -> Result<&mut Word, Error> {
        let addr = self.resolve(ptr)?;
        if addr >= self.memory.len() {
            self.memory.resize(addr + 1, 0);
        }
        Ok(&mut self.memory[addr])
    }

    fn read_operand(&self, oa: Operand) -> Result<Word, Error> {
        match oa {
            Operand::Imm(x) => Ok(x),
            Operand::Mem(r) => Ok(self.peek(self.resolve(r)?)),
        }
    }

    fn fetch(&self, ip: u64) -> [Word; 4] {
        let ip = ip as usize;
        [self.peek(ip), self.peek(ip + 1), self.peek(ip + 2), self.peek(ip + 3)]
    }

    fn step(&mut self) -> Result<Option<Word>, Error> {
        let ip = match self.state {
            VMState::Running   { ip } => ip,
            VMState::WaitInput { .. } => return Err(Error::InputNotSupplied),
            VMState::Stopped          => return Ok(None),
        };

        let (inst, len) = Instruction::decode(self.fetch(ip), ip)?;
        trace!("{:>6} {:?}", ip, inst);
        self.steps += 1;

        let mut next_ip = ip + len;
        let mut output = None;

        use Instruction::*;
        match inst {
            XXM(op, s1, s2, d) => {
                let s1 = self.read_operand(s1)?;
                let s2 = self.read_operand(s2)?;
                use OpXXM::*;
                let result = match op {
                    Add => s1.checked_add(s2),
                    Mul => s1.checked_mul(s2),
                    Les => Some((s1 <  s2) as Word),
                    Equ => Some((s1 == s2) as Word),
                };
                let result = result.ok_or(Error::Overflow { ip })?;
                *self.mem_mut(d)? = result;
            }

            XX(op, x1, x2) => {
                let x1 = self.read_operand(x1)?;
                let x2 = self.read_operand(x2)?;
                let taken = match op {
                    OpXX::JiT => x1 != 0,
                    OpXX::JiF => x1 == 0,
                };
                if taken {
                    next_ip = u64::try_from(x2).map_err(|_| Error::NegativeAddress(x2))?;
                }
            }

            X(op, x) => {
                let x = self.read_operand(x)?;
                match op {
                    OpX::Out => { output = Some(x); }
                    OpX::ARB => {
                        self.rel_base = self.rel_base.checked_add(x)
                            .ok_or(Error::Overflow { ip })?;
                    }
                }
            }

            Inp(dest) => {
                self.state = VMState::WaitInput { dest, resume_ip: next_ip };
                return Ok(None);
            }

            Halt => {
                self.state = VMState::Stopped;
                return Ok(None);
            }
        };

        self.state = VMState::Running { ip: next_ip };
        Ok(output)
    }
}

/// Runs a fresh machine to completion on the given input.
pub fn run_vm(mem: Vec<Word>, input: impl IntoIterator<Item = Word>) -> Result<Vec<Word>, Error> {
    let mut vm = VM::new(mem);
    match vm.run_with_input(input)? {
        (output, VMResult::Stopped) => Ok(output),
        _                           => Err(Error::InputExhausted),
    }
}

pub fn parse_program(src: &str) -> Result<Vec<Word>, Error> {
    src.trim()
        .split(',')
        .map(str::trim)
        .filter(|digits| !digits.is_empty())
        .map(|digits| digits.parse::<Word>()
            .map_err(|source| Error::Parse { word: digits.to_string(), source }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_memory(mem: Vec<Word>) -> Vec<Word> {
        let mut vm = VM::new(mem);
        assert_eq!(vm.run().unwrap(), VMResult::Stopped);
        vm.dump_memory()
    }

    #[test]
    fn test_add_mul() {
        assert_eq!(final_memory(vec![1,0,0,0,99]), vec![2,0,0,0,99]);
        assert_eq!(final_memory(vec![2,3,0,3,99]), vec![2,3,0,6,99]);
        assert_eq!(final_memory(vec![2,4,4,5,99,0]), vec![2,4,4,5,99,9801]);
        assert_eq!(final_memory(vec![1,1,1,4,99,5,6,0,99]), vec![30,1,1,4,2,5,6,0,99]);
        assert_eq!(
            final_memory(vec![1,9,10,3,2,3,11,0,99,30,40,50]),
            vec![3500,9,10,70,2,3,11,0,99,30,40,50]
        );
    }

    #[test]
    fn test_parameter_modes() {
        assert_eq!(final_memory(vec![1002,4,3,4,33]), vec![1002,4,3,4,99]);
        assert_eq!(final_memory(vec![1101,100,-1,4,0]), vec![1101,100,-1,4,99]);
    }

    #[test]
    fn test_compare_and_jump() {
        let eq8_pos = vec![3,9,8,9,10,9,4,9,99,-1,8];
        let lt8_imm = vec![3,3,1107,-1,8,3,4,3,99];
        let nonzero = vec![3,12,6,12,15,1,13,14,13,4,13,99,-1,0,1,9];

        assert_eq!(run_vm(eq8_pos.clone(), vec![8]).unwrap(), vec![1]);
        assert_eq!(run_vm(eq8_pos,         vec![7]).unwrap(), vec![0]);
        assert_eq!(run_vm(lt8_imm.clone(), vec![3]).unwrap(), vec![1]);
        assert_eq!(run_vm(lt8_imm,         vec![9]).unwrap(), vec![0]);
        assert_eq!(run_vm(nonzero.clone(), vec![0]).unwrap(), vec![0]);
        assert_eq!(run_vm(nonzero,         vec![5]).unwrap(), vec![1]);
    }

    #[test]
    fn test_around_eight() {
        let program = parse_program(
            "3,21,1008,21,8,20,1005,20,22,107,8,21,20,1006,20,31,\
             1106,0,36,98,0,0,1002,21,125,20,4,20,1105,1,46,104,\
             999,1105,1,46,1101,1000,1,20,4,20,1105,1,46,98,99"
        ).unwrap();

        assert_eq!(run_vm(program.clone(), vec![7]).unwrap(), vec![999]);
        assert_eq!(run_vm(program.clone(), vec![8]).unwrap(), vec![1000]);
        assert_eq!(run_vm(program,         vec![9]).unwrap(), vec![1001]);
    }

    #[test]
    fn test_relative_base() {
        let quine = vec![109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99];
        assert_eq!(run_vm(quine.clone(), vec![]).unwrap(), quine);

        let big = run_vm(vec![1102,34915192,34915192,7,4,7,99,0], vec![]).unwrap();
        assert_eq!(big, vec![1219070632396864]);

        let literal = run_vm(vec![104,1125899906842624,99], vec![]).unwrap();
        assert_eq!(literal, vec![1125899906842624]);
    }

    #[test]
    fn test_relative_input() {
        // rb = 50; read into rb+3; echo it
        let program = vec![109,50,203,3,204,3,99];
        assert_eq!(run_vm(program, vec![42]).unwrap(), vec![42]);
    }

    #[test]
    fn test_suspend_resume() {
        let mut vm = VM::new(vec![3,9,4,9,3,9,4,9,99,0]);
        vm.run().unwrap().expect_wait_input().unwrap();
        assert!(vm.waiting());
        vm.feed_input(5).unwrap();
        assert_eq!(vm.run().unwrap().expect_output().unwrap(), 5);

        let snapshot = vm.clone();
        vm.run().unwrap().expect_wait_input().unwrap();
        vm.feed_input(6).unwrap();
        assert_eq!(vm.run().unwrap(), VMResult::Output(6));
        assert_eq!(vm.run().unwrap(), VMResult::Stopped);
        assert!(vm.stopped());
        assert_eq!(vm.run().unwrap(), VMResult::Stopped);

        let mut replay = snapshot;
        let (out, end) = replay.run_with_input(vec![7]).unwrap();
        assert_eq!(out, vec![7]);
        assert_eq!(end, VMResult::Stopped);
    }

    #[test]
    fn test_run_with_input_stops_when_starved() {
        let mut vm = VM::new(vec![3,11,4,11,3,11,4,11,99,0,0,0]);
        let (out, end) = vm.run_with_input(vec![1]).unwrap();
        assert_eq!(out, vec![1]);
        assert_eq!(end, VMResult::WaitInput);

        let (out, end) = vm.run_with_input(vec![2]).unwrap();
        assert_eq!(out, vec![2]);
        assert_eq!(end, VMResult::Stopped);
    }

    #[test]
    fn test_input_misuse() {
        let mut vm = VM::new(vec![3,3,99,0]);
        assert!(matches!(vm.feed_input(1), Err(Error::NotWaitingForInput)));
        vm.run().unwrap();
        assert!(matches!(vm.run(), Err(Error::InputNotSupplied)));
        assert!(matches!(run_vm(vec![3,3,99,0], vec![]), Err(Error::InputExhausted)));
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(VM::new(vec![42]).run(), Err(Error::BadOpcode { opcode: 42, ip: 0 })));
        assert!(matches!(VM::new(vec![304,0,99]).run(), Err(Error::BadMode { mode: 3, .. })));
        assert!(matches!(VM::new(vec![11101,1,1,0,99]).run(),
                         Err(Error::ImmediateDestination { ip: 0 })));
        assert!(matches!(VM::new(vec![4,-1,99]).run(), Err(Error::NegativeAddress(-1))));
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(VM::new(vec![1101,Word::MAX,1,0,99]).run(), Err(Error::Overflow { ip: 0 })));
        assert!(matches!(VM::new(vec![1102,Word::MIN,-1,0,99]).run(), Err(Error::Overflow { ip: 0 })));
        assert!(matches!(VM::new(vec![109,Word::MAX,109,1,99]).run(), Err(Error::Overflow { ip: 2 })));
        assert!(matches!(VM::new(vec![109,Word::MAX,204,1,99]).run(),
                         Err(Error::AddressOverflow { offset: 1, .. })));
        assert_eq!(run_vm(vec![1101,Word::MAX,-1,7,4,7,99], vec![]).unwrap(), vec![Word::MAX - 1]);
    }

    #[test]
    fn test_memory_grows() {
        let mut vm = VM::new(vec![1101,2,3,1000,4,1000,99]);
        assert_eq!(vm.run().unwrap(), VMResult::Output(5));
        assert_eq!(vm.peek(1000), 5);
        assert_eq!(vm.peek(5000), 0);
        vm.poke(2000, 9);
        assert_eq!(vm.dump_memory().len(), 2001);
    }

    #[test]
    fn test_parse_program() {
        assert_eq!(parse_program(" 1, 0,0,-3,99\n").unwrap(), vec![1,0,0,-3,99]);
        assert!(matches!(parse_program("1,x,3"), Err(Error::Parse { .. })));
        assert_eq!(parse_program("").unwrap(), Vec::<Word>::new());
    }
}
