use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

use crate::error::Error;
use crate::model::State;

use super::Hook;

/// Presets RAM cells before the first step, e.g. `SP`, `LCL` or test inputs.
#[derive(Debug)]
pub struct Init {
    file: Option<String>,
    list: List,
}

/// Address to value; negative values are stored in two's complement.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct List(BTreeMap<u16, i32>);

impl Init {
    pub fn arg(file: Option<String>) -> Result<Self, Error> {
        let list = match &file {
            Some(fname) => {
                let f = File::open(fname).map_err(|e| Error::FileOpen(fname.clone(), e))?;
                serde_yaml::from_reader(BufReader::new(f))
                    .map_err(|e| Error::Config(fname.clone(), e))?
            }
            None => List::default(),
        };
        Ok(Self { file, list })
    }

    pub fn from_list(list: List) -> Self {
        Self { file: None, list }
    }
}

impl Hook for Init {
    fn init(&mut self, mut state: State) -> State {
        if let Some(fname) = &self.file {
            println!(" * Init[{}] {:?}", self.list.0.len(), fname);
        }
        for (addr, val) in &self.list.0 {
            state.set(*addr, *val as u16);
        }
        state
    }

    fn exec(&mut self, _time: u64, _addr: u16, _code: u16, state: State) -> State {
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_ram() {
        let list: List = serde_yaml::from_str("0: 256\n1: 300\n5000: -1\n").unwrap();
        let mut hook = Init::from_list(list);
        let state = hook.init(State::new());
        assert_eq!(state.get(0u16), 256);
        assert_eq!(state.get(1u16), 300);
        assert_eq!(state.get(5000u16), 0xFFFF);
    }
}
