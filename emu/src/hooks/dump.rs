use arch::inst::Inst;
use arch::symbol::{ARG, LCL, SP, STACK_BASE, THAT, THIS};
use color_print::cformat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use crate::error::Error;
use crate::model::State;

use super::Hook;

/// Prints registers and memory after the instructions at configured addresses.
#[derive(Debug)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: List,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct List(HashMap<u16, Config>);

#[derive(Debug, Serialize, Deserialize)]
struct Config {
    #[serde(default)]
    stack: bool,
    #[serde(default)]
    ram: Vec<u16>,
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool) -> Result<Self, Error> {
        let list = match &file {
            Some(fname) => {
                let f = File::open(fname).map_err(|e| Error::FileOpen(fname.clone(), e))?;
                serde_yaml::from_reader(BufReader::new(f))
                    .map_err(|e| Error::Config(fname.clone(), e))?
            }
            None => List::default(),
        };
        Ok(Self { file, all, list })
    }

    fn get(&self, pc: u16) -> Option<&Config> {
        self.list.0.get(&pc)
    }
}

impl Hook for Dump {
    fn init(&mut self, state: State) -> State {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(" * Dump[{}] {:?}", self.list.0.len(), fname);
        }
        state
    }

    fn exec(&mut self, time: u64, addr: u16, code: u16, cpu: State) -> State {
        let cfg = self.get(addr);
        if cfg.is_none() && !self.all {
            return cpu;
        }
        let inst = match Inst::from_bin(code) {
            Some(inst) => inst.cformat(),
            None => cformat!("<r,s>{:016b}</>", code),
        };
        println!("[{:0>6}] {:04X}: {}", time, addr, inst);
        self.print_reg(&cpu);
        if let Some(cfg) = cfg {
            if cfg.stack {
                self.print_stack(&cpu);
            }
            self.print_ram(&cpu, &cfg.ram);
        }
        cpu
    }
}

impl Dump {
    fn print_reg(&self, cpu: &State) {
        println!(" +-----------+-----------+-----------+-----------+");
        println!(
            " |  A: {:0>4X} |  D: {:0>4X} | PC: {:0>4X} | SP: {:0>4X} |",
            cpu.a(),
            cpu.d(),
            cpu.pc(),
            cpu.get(SP)
        );
        println!(
            " | LCL: {:0>4X}| ARG: {:0>4X}| THIS:{:0>4X}| THAT:{:0>4X}|",
            cpu.get(LCL),
            cpu.get(ARG),
            cpu.get(THIS),
            cpu.get(THAT)
        );
        println!(" +-----------+-----------+-----------+-----------+");
    }

    fn print_stack(&self, cpu: &State) {
        let sp = cpu.get(SP);
        for addr in STACK_BASE..sp {
            println!(" | {:0>4X} : {:0>4X}                                   |", addr, cpu.get(addr));
        }
        println!(" +-----------------------------------------------+");
    }

    fn print_ram(&self, cpu: &State, addrs: &[u16]) {
        for addr in addrs {
            println!(" | {:0>4X} : {:0>4X}                                   |", addr, cpu.get(*addr));
        }
        println!(" +-----------------------------------------------+");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_format() {
        let yaml = "10:\n  stack: true\n  ram: [256, 257]\n42:\n  ram: [0]\n";
        let list: List = serde_yaml::from_str(yaml).unwrap();
        assert!(list.0[&10].stack);
        assert_eq!(list.0[&10].ram, vec![256, 257]);
        assert!(!list.0[&42].stack);
    }
}
