use std::path::Path;

use arch::alu::compute;
use arch::inst::{Dest, Jump};
use arch::symbol::ROM_SIZE;

use crate::error::Error;

/// Hack CPU: instruction ROM, data RAM and the A, D and PC registers.
pub struct State {
    rom: Vec<u16>,
    rom_len: usize,
    ram: Vec<u16>,
    a: u16,
    d: u16,
    pc: u16,
    halted: bool,
}

// Memory access
impl State {
    pub fn get(&self, addr: impl Into<u16>) -> u16 {
        self.ram[addr.into() as usize]
    }

    pub fn set(&mut self, addr: impl Into<u16>, val: u16) {
        self.ram[addr.into() as usize] = val;
    }

    pub fn a(&self) -> u16 {
        self.a
    }

    pub fn d(&self) -> u16 {
        self.d
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn rom(&self, addr: u16) -> u16 {
        self.rom.get(addr as usize).copied().unwrap_or(0)
    }
}

impl State {
    pub fn new() -> Self {
        State {
            rom: vec![0; ROM_SIZE],
            rom_len: 0,
            ram: vec![0; 1 << 16],
            a: 0,
            d: 0,
            pc: 0,
            halted: false,
        }
    }

    /// Load `.hack` text: one 16-character binary line per instruction.
    pub fn load_hack_str(&mut self, text: &str) -> Result<(), Error> {
        let mut words = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let valid = line.len() == 16 && line.chars().all(|c| c == '0' || c == '1');
            let word = u16::from_str_radix(line, 2)
                .ok()
                .filter(|_| valid)
                .ok_or_else(|| Error::InvalidLine(idx, line.to_string()))?;
            words.push(word);
        }
        if words.len() > ROM_SIZE {
            return Err(Error::RomOverflow(words.len()));
        }
        self.rom[..words.len()].copy_from_slice(&words);
        self.rom_len = words.len();
        self.pc = 0;
        self.halted = false;
        Ok(())
    }

    pub fn load_hack_file(&mut self, path: &Path) -> Result<(), Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::FileOpen(path.display().to_string(), e))?;
        self.load_hack_str(&text)
    }

    /// Halted on the `(L) @L 0;JMP` idiom, or ran past the end of the program.
    pub fn is_terminated(&self) -> bool {
        self.halted
    }

    /// Execute one instruction; returns its address and code.
    pub fn exec(&mut self) -> (u16, u16) {
        let pc = self.pc;
        if pc as usize >= self.rom_len {
            self.halted = true;
            return (pc, 0);
        }
        let code = self.rom[pc as usize];

        if code & 0x8000 == 0 {
            self.a = code;
            self.pc = pc.wrapping_add(1);
            return (pc, code);
        }

        let comp = ((code >> 6) & 0x7F) as u8;
        let dest = Dest::from_bits((code >> 3) as u8);
        let jump = Jump::from_bits(code as u8);

        let addr = self.a;
        let out = compute(comp, self.d, addr, self.get(addr));
        if dest.m() {
            self.set(addr, out);
        }
        if dest.a() {
            self.a = out;
        }
        if dest.d() {
            self.d = out;
        }

        if jump.taken(out) {
            if jump == Jump::JMP && addr.wrapping_add(1) == pc && self.rom(addr) == addr {
                self.halted = true;
            }
            self.pc = addr;
        } else {
            self.pc = pc.wrapping_add(1);
        }
        (pc, code)
    }

    /// Run until halted or `max_steps` instructions; returns the number executed.
    pub fn run(&mut self, max_steps: u64) -> u64 {
        let mut steps = 0;
        while steps < max_steps && !self.halted {
            self.exec();
            steps += 1;
        }
        steps
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
