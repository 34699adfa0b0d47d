//! Realm access through the external `gnokey` tool.
//!
//! Commands talk to the oracle realm only through the [`Realm`] trait: a
//! read-only `query` returning the raw `vm/qeval` text, and a signed `call`
//! whose result is only success or failure. Signing, broadcasting and fees
//! stay inside `gnokey`.

use crate::core::config::Config;
use crate::core::contract_error;
use crate::core::error::GooError;
use crate::qeval::records;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use tracing::{debug, info};

pub const GNOKEY_BIN: &str = "gnokey";

pub trait Realm {
    /// Evaluate a read-only realm function and return the raw response text.
    fn query(&self, func: &str, args: &[String]) -> Result<String, GooError>;

    /// Submit a signed call, optionally sending coins (e.g. `"2000000ugnot"`).
    fn call(&self, func: &str, args: &[String], send: Option<&str>) -> Result<(), GooError>;

    /// Query a zero-argument getter that returns a single `int64`.
    fn query_int64(&self, func: &str) -> Result<i64, GooError> {
        let raw = self.query(func, &[])?;
        records::decode_int64(&raw)
    }
}

#[derive(Debug, Clone)]
pub struct GnokeyExecutor {
    pub bin: String,
    pub key_name: String,
    pub realm_path: String,
    pub chain_id: String,
    pub remote: String,
    pub gas_fee: String,
    pub gas_wanted: i64,
    pub verbose: bool,
}

impl GnokeyExecutor {
    pub fn new(cfg: &Config, verbose: bool) -> Self {
        GnokeyExecutor {
            bin: GNOKEY_BIN.to_string(),
            key_name: cfg.keyname.clone(),
            realm_path: cfg.realm_path.clone(),
            chain_id: cfg.chain_id.clone(),
            remote: cfg.remote.clone(),
            gas_fee: cfg.gas_fee.clone(),
            gas_wanted: cfg.gas_wanted,
            verbose,
        }
    }

    /// `<realm>.<Func>("a","b")` expression for `vm/qeval`.
    pub fn query_expression(&self, func: &str, args: &[String]) -> String {
        let quoted = args
            .iter()
            .map(|a| format!("\"{}\"", a.replace('\\', "\\\\").replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}.{}({})", self.realm_path, func, quoted)
    }

    pub fn query_args(&self, func: &str, args: &[String]) -> Vec<String> {
        vec![
            "query".to_string(),
            "vm/qeval".to_string(),
            "--remote".to_string(),
            self.remote.clone(),
            "--data".to_string(),
            self.query_expression(func, args),
        ]
    }

    pub fn call_args(&self, func: &str, args: &[String], send: Option<&str>) -> Vec<String> {
        let mut out = vec![
            "maketx".to_string(),
            "call".to_string(),
            "--pkgpath".to_string(),
            self.realm_path.clone(),
            "--func".to_string(),
            func.to_string(),
            "--gas-fee".to_string(),
            self.gas_fee.clone(),
            "--gas-wanted".to_string(),
            self.gas_wanted.to_string(),
            "--broadcast".to_string(),
            "--chainid".to_string(),
            self.chain_id.clone(),
            "--remote".to_string(),
            self.remote.clone(),
        ];
        for arg in args {
            out.push("--args".to_string());
            out.push(arg.clone());
        }
        if let Some(coins) = send.filter(|s| !s.is_empty()) {
            out.push("--send".to_string());
            out.push(coins.to_string());
        }
        out.push(self.key_name.clone());
        out
    }
}

/// Shell-ish rendering of a command line for display.
pub fn display_command(bin: &str, args: &[String]) -> String {
    let mut line = bin.to_string();
    for arg in args {
        line.push(' ');
        if arg.contains([' ', '\t', '\n', '"', '\'']) {
            line.push_str(&format!("\"{}\"", arg.replace('"', "\\\"")));
        } else {
            line.push_str(arg);
        }
    }
    line
}

impl Realm for GnokeyExecutor {
    fn query(&self, func: &str, args: &[String]) -> Result<String, GooError> {
        let cmd_args = self.query_args(func, args);
        debug!(command = %display_command(&self.bin, &cmd_args), "realm query");
        if self.verbose {
            println!("Executing:\n{}\n", display_command(&self.bin, &cmd_args));
        }

        let output = Command::new(&self.bin)
            .args(&cmd_args)
            .output()
            .map_err(|e| GooError::ExecutorError(format!("failed to run {}: {}", self.bin, e)))?;

        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        if self.verbose {
            println!("{}", text);
        }

        if !output.status.success() {
            return Err(contract_error::translate(&format!("query failed: {}", text)));
        }
        Ok(text)
    }

    fn call(&self, func: &str, args: &[String], send: Option<&str>) -> Result<(), GooError> {
        let cmd_args = self.call_args(func, args, send);
        // Always shown: the operator is about to sign this.
        println!("Executing:\n{}\n", display_command(&self.bin, &cmd_args));
        info!(func, "submitting realm call");

        let mut command = Command::new(&self.bin);
        command.args(&cmd_args).stdin(Stdio::inherit());
        if self.verbose {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
            print!("Password: ");
            io::stdout().flush()?;
        }

        let output = command
            .output()
            .map_err(|e| GooError::ExecutorError(format!("failed to run {}: {}", self.bin, e)))?;
        if !self.verbose {
            println!();
        }

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !self.verbose && !stderr.trim().is_empty() {
            return Err(contract_error::translate(&stderr));
        }
        Err(GooError::ExecutorError(format!(
            "{} exited with {}",
            self.bin, output.status
        )))
    }
}
