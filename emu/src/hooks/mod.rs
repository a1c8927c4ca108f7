pub mod dump;
pub mod init;

use crate::model::State;

/// Side effects run around the CPU: once before the first step and after every step.
pub trait Hook {
    fn init(&mut self, state: State) -> State;
    fn exec(&mut self, time: u64, addr: u16, code: u16, state: State) -> State;
}
