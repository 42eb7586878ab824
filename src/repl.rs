//! Plotscript REPL and its interpreter kernel.
//!
//! The [`Kernel`] runs an [`Interpreter`] on a worker thread. Lines travel to
//! it through the input mailbox and every evaluated line comes back as exactly
//! one reply on the output mailbox.
//!
//! ## Kernel Commands
//!
//! - `%start`: start the kernel if it is stopped
//! - `%stop`: stop the kernel and join its thread
//! - `%reset`: restart with a fresh interpreter
//! - `%exit`: stop the kernel and leave the REPL

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::ast::Expression;
use crate::engine::{Interpreter, InterpreterConfig};
use crate::mailbox::{KernelChannels, Reply};

pub const PROMPT: &str = "plotscript> ";
pub const NOT_RUNNING: &str = "Error: interpreter kernel not running";
pub const INTERRUPTED: &str = "Error: interpreter kernel interrupted";

const STOP_SIGNAL: &str = "%stop";
const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Stack for threads that parse and evaluate deeply nested programs.
pub const EVAL_STACK_SIZE: usize = 64 * 1024 * 1024;

// ============================================================================
// COMMANDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelCommand {
    Start,
    Stop,
    Reset,
    Exit,
}

impl KernelCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "%start" => Some(Self::Start),
            "%stop" => Some(Self::Stop),
            "%reset" => Some(Self::Reset),
            "%exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// What the REPL should do after handling one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Output(String),
    Silent,
    Exit,
}

// ============================================================================
// KERNEL
// ============================================================================

/// Sets the kernel's cooperative interrupt flag from another thread.
#[derive(Debug, Clone)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    pub fn interrupt(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True while an interrupt is waiting to be observed by the kernel.
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Routes Ctrl-C to the kernel's interrupt flag. Can be installed once per process.
pub fn install_interrupt_handler(kernel: &Kernel) -> Result<(), ctrlc::Error> {
    let handle = kernel.interrupt_handle();
    ctrlc::set_handler(move || handle.interrupt())
}

pub struct Kernel {
    config: InterpreterConfig,
    channels: Arc<KernelChannels>,
    worker: Option<JoinHandle<()>>,
    interrupted: Arc<AtomicBool>,
    /// Replies still owed for interrupted submissions.
    abandoned: usize,
}

impl Kernel {
    /// Creates a kernel and starts its worker.
    pub fn new(config: InterpreterConfig) -> io::Result<Self> {
        let mut kernel = Self {
            config,
            channels: Arc::new(KernelChannels::new()),
            worker: None,
            interrupted: Arc::new(AtomicBool::new(false)),
            abandoned: 0,
        };
        kernel.start()?;
        Ok(kernel)
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }

    pub fn start(&mut self) -> io::Result<()> {
        if self.is_running() {
            return Ok(());
        }
        if let Some(stale) = self.worker.take() {
            if stale.join().is_err() {
                warn!("kernel thread panicked");
            }
        }
        let config = self.config;
        let channels = Arc::clone(&self.channels);
        let worker = thread::Builder::new()
            .name("plotscript-kernel".into())
            .stack_size(EVAL_STACK_SIZE)
            .spawn(move || kernel_loop(config, &channels))?;
        self.worker = Some(worker);
        debug!("kernel started");
        Ok(())
    }

    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.channels.store_input(STOP_SIGNAL);
        if worker.join().is_err() {
            warn!("kernel thread panicked");
        }
        self.channels.clear();
        self.abandoned = 0;
        self.interrupted.store(false, Ordering::SeqCst);
        debug!("kernel stopped");
    }

    pub fn reset(&mut self) -> io::Result<()> {
        self.stop();
        self.start()
    }

    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle(Arc::clone(&self.interrupted))
    }

    /// Handles one REPL line: a kernel command, a blank line, or a program.
    pub fn handle(&mut self, line: &str) -> io::Result<Response> {
        if line.trim().is_empty() {
            return Ok(Response::Silent);
        }
        match KernelCommand::parse(line) {
            Some(KernelCommand::Start) => self.start()?,
            Some(KernelCommand::Stop) => self.stop(),
            Some(KernelCommand::Reset) => self.reset()?,
            Some(KernelCommand::Exit) => {
                self.stop();
                return Ok(Response::Exit);
            }
            None => return Ok(Response::Output(self.submit(line))),
        }
        Ok(Response::Silent)
    }

    /// Sends one program to the worker and waits for its reply.
    pub fn submit(&mut self, line: &str) -> String {
        if !self.is_running() {
            return NOT_RUNNING.to_string();
        }
        while self.abandoned > 0 {
            match self.wait_for_reply() {
                Some(_) => self.abandoned -= 1,
                None => return INTERRUPTED.to_string(),
            }
        }
        self.channels.store_input(line);
        match self.wait_for_reply() {
            Some(reply) => format_reply(reply),
            None => {
                self.abandoned += 1;
                INTERRUPTED.to_string()
            }
        }
    }

    /// Polls the output mailbox; `None` once an interrupt is requested.
    fn wait_for_reply(&mut self) -> Option<Reply> {
        loop {
            if self.interrupted.swap(false, Ordering::SeqCst) {
                warn!(pending = self.abandoned + 1, "kernel interrupted");
                return None;
            }
            if let Some(reply) = self.channels.get_output_timeout(POLL_INTERVAL) {
                return Some(reply);
            }
            if !self.is_running() {
                return Some((NOT_RUNNING.to_string(), Expression::default()));
            }
        }
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        self.stop();
    }
}

fn kernel_loop(config: InterpreterConfig, channels: &KernelChannels) {
    let mut interpreter = match Interpreter::with_config(config) {
        Ok(interpreter) => Some(interpreter),
        Err(err) => {
            warn!(%err, "kernel could not load its interpreter");
            None
        }
    };
    loop {
        let line = channels.get_input();
        if line == STOP_SIGNAL {
            break;
        }
        let reply = match interpreter.as_mut() {
            Some(interpreter) => match interpreter.run(&line) {
                Ok(value) => (String::new(), value),
                Err(err) => (err.to_string(), Expression::default()),
            },
            None => (NOT_RUNNING.to_string(), Expression::default()),
        };
        channels.store_output(reply);
    }
}

fn format_reply((error, value): Reply) -> String {
    if error.is_empty() {
        value.to_string()
    } else {
        error
    }
}

// ============================================================================
// REPL LOOP
// ============================================================================

/// Runs the interactive loop on stdin and stdout.
pub fn run_repl(config: InterpreterConfig) -> io::Result<()> {
    let mut kernel = Kernel::new(config)?;
    if let Err(err) = install_interrupt_handler(&kernel) {
        warn!(%err, "Ctrl-C will not interrupt evaluation");
    }
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut kernel, stdin.lock(), stdout.lock())
}

/// Reads lines from `input` until EOF or `%exit`, writing replies to `output`.
pub fn run_session<R: BufRead, W: Write>(kernel: &mut Kernel, input: R, mut output: W) -> io::Result<()> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;
    for line in input.lines() {
        match kernel.handle(&line?)? {
            Response::Output(text) => writeln!(output, "{}", text)?,
            Response::Silent => {}
            Response::Exit => return Ok(()),
        }
        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn session(script: &str) -> String {
        let mut kernel = Kernel::new(InterpreterConfig::default()).unwrap();
        let mut output = Vec::new();
        run_session(&mut kernel, Cursor::new(script), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn commands_are_recognized() {
        assert_eq!(KernelCommand::parse("%start"), Some(KernelCommand::Start));
        assert_eq!(KernelCommand::parse(" %exit "), Some(KernelCommand::Exit));
        assert_eq!(KernelCommand::parse("(%stop)"), None);
    }

    #[test]
    fn session_prints_one_reply_per_line() {
        let out = session("(define a 1)\n\n(+ a 1)\n");
        let replies: Vec<&str> = out
            .split(PROMPT)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(replies, vec!["(1)", "(2)"]);
    }

    #[test]
    fn stopped_kernel_reports_not_running() {
        let out = session("%stop\n(+ 1 2)\n%start\n(+ 1 2)\n");
        assert!(out.contains(NOT_RUNNING));
        assert!(out.contains("(3)"));
    }

    #[test]
    fn reset_forgets_definitions() {
        let out = session("(define a 1)\n%reset\n(a)\n");
        assert!(out.contains("Error:"));
    }

    #[test]
    fn exit_stops_reading() {
        let out = session("%exit\n(+ 1 2)\n");
        assert!(!out.contains("(3)"));
    }

    #[test]
    fn errors_do_not_stop_the_kernel() {
        let mut kernel = Kernel::new(InterpreterConfig::default()).unwrap();
        assert_eq!(kernel.submit("(+ 1"), "Error: Invalid Expression. Could not parse.");
        assert!(kernel.submit("(first (list))").starts_with("Error:"));
        assert_eq!(kernel.submit("(+ 1 2)"), "(3)");
    }

    #[test]
    fn interrupted_reply_is_discarded() {
        let mut kernel = Kernel::new(InterpreterConfig::default()).unwrap();
        let handle = kernel.interrupt_handle();
        handle.interrupt();
        assert!(handle.is_pending());
        assert_eq!(kernel.submit("(+ 1 1)"), INTERRUPTED);
        assert!(!handle.is_pending());
        assert_eq!(kernel.submit("(+ 2 2)"), "(4)");
    }
}
