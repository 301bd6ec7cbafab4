//! Several machines wired output-to-input through queues.
//!
//! Machine `i` feeds machine `i + 1`. With feedback on, the last machine also
//! feeds the first. Scheduling is cooperative: each machine runs until it
//! halts or blocks on an empty queue, then the next one gets a turn.

use {
    std::collections::VecDeque,
    log::debug,
    crate::{Error, VM, VMResult, Word},
};

struct Node {
    vm: VM,
    inbox: VecDeque<Word>,
}

pub struct Network {
    nodes: Vec<Node>,
    feedback: bool,
    last_output: Option<Word>,
}

impl Network {
    pub fn new(vms: impl IntoIterator<Item = VM>, feedback: bool) -> Network {
        let nodes = vms.into_iter()
            .map(|vm| Node { vm, inbox: VecDeque::new() })
            .collect();
        Network { nodes, feedback, last_output: None }
    }

    /// One copy of `program` per phase, each primed with its phase setting.
    pub fn with_phases(program: &[Word], phases: &[Word], feedback: bool) -> Network {
        let mut net = Network::new(
            phases.iter().map(|_| VM::new(program.to_vec())),
            feedback
        );
        for (node, phase) in net.nodes.iter_mut().zip(phases) {
            node.inbox.push_back(*phase);
        }
        net
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Queues a word for machine `index`.
    pub fn send(&mut self, index: usize, word: Word) -> Result<(), Error> {
        let len = self.nodes.len();
        let node = self.nodes.get_mut(index)
            .ok_or(Error::NoSuchMachine { index, len })?;
        node.inbox.push_back(word);
        Ok(())
    }

    /// Runs until every machine halts. Returns the last word the final
    /// machine emitted, if any.
    pub fn run(&mut self) -> Result<Option<Word>, Error> {
        loop {
            let mut progressed = false;
            for index in 0..self.nodes.len() {
                progressed |= self.pump(index)?;
            }

            if self.nodes.iter().all(|node| node.vm.stopped()) {
                return Ok(self.last_output);
            }

            if !progressed {
                return Err(Error::Deadlock);
            }
        }
    }

    fn pump(&mut self, index: usize) -> Result<bool, Error> {
        let mut progressed = false;
        loop {
            let node = &mut self.nodes[index];
            if node.vm.waiting() {
                match node.inbox.pop_front() {
                    Some(word) => { node.vm.feed_input(word)?; progressed = true; }
                    None       => { return Ok(progressed); }
                }
            }

            match node.vm.run()? {
                VMResult::Output(word) => { progressed = true; self.route(index, word); }
                VMResult::WaitInput    => { }
                VMResult::Stopped      => {
                    debug!("machine {} halted", index);
                    return Ok(progressed);
                }
            }
        }
    }

    fn route(&mut self, from: usize, word: Word) {
        let to = from + 1;
        if to < self.nodes.len() {
            self.nodes[to].inbox.push_back(word);
        }
        else {
            self.last_output = Some(word);
            if self.feedback {
                self.nodes[0].inbox.push_back(word);
            }
        }
    }
}

/// Straight pipeline: `signal` into the first machine, result out of the last.
pub fn run_chain(program: &[Word], phases: &[Word], signal: Word) -> Result<Option<Word>, Error> {
    let mut net = Network::with_phases(program, phases, false);
    if !net.is_empty() {
        net.send(0, signal)?;
    }
    net.run()
}

/// As `run_chain`, but the last machine's output loops back to the first.
pub fn run_feedback(program: &[Word], phases: &[Word], signal: Word) -> Result<Option<Word>, Error> {
    let mut net = Network::with_phases(program, phases, true);
    if !net.is_empty() {
        net.send(0, signal)?;
    }
    net.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain() {
        let program = vec![3,15,3,16,1002,16,10,16,1,16,15,15,4,15,99,0,0];
        assert_eq!(run_chain(&program, &[4,3,2,1,0], 0).unwrap(), Some(43210));

        let program = vec![3,23,3,24,1002,24,10,24,1002,23,-1,23,
                           101,5,23,23,1,24,23,23,4,23,99,0,0];
        assert_eq!(run_chain(&program, &[0,1,2,3,4], 0).unwrap(), Some(54321));
    }

    #[test]
    fn test_feedback() {
        let program = vec![3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,
                           27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5];
        assert_eq!(run_feedback(&program, &[9,8,7,6,5], 0).unwrap(), Some(139629729));
    }

    #[test]
    fn test_deadlock() {
        // both machines want two words but only one ever arrives
        let program = vec![3,9,3,9,4,9,99,0,0,0];
        let mut net = Network::new(vec![VM::new(program.clone()), VM::new(program)], true);
        net.send(0, 1).unwrap();
        assert!(matches!(net.run(), Err(Error::Deadlock)));
    }

    #[test]
    fn test_send_out_of_range() {
        let mut net = Network::with_phases(&[3,0,99], &[1, 2], false);
        assert!(net.send(1, 7).is_ok());
        assert!(matches!(net.send(2, 7), Err(Error::NoSuchMachine { index: 2, len: 2 })));
        assert!(matches!(Network::new(Vec::new(), true).send(0, 1), Err(Error::NoSuchMachine { .. })));
    }

    #[test]
    fn test_empty() {
        assert_eq!(run_chain(&[99], &[], 0).unwrap(), None);
    }
}
