use crate::core::error::GooError;
use crate::core::executor::Realm;
use crate::core::{output, time};
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(name = "admin", about = "Oracle administration (admin key only)")]
pub struct AdminCli {
    #[clap(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Set how long a proposal can be disputed, in seconds.
    SetResolutionDuration { seconds: i64 },
    /// Set the default requester reward, in ugnot.
    SetReward { amount: i64 },
    /// Set the proposer/disputer bond, in ugnot.
    SetBond { amount: i64 },
    /// Transfer admin rights to another address.
    ChangeAdmin { address: String },
}

fn non_negative(what: &str, n: i64) -> Result<String, GooError> {
    if n < 0 {
        return Err(GooError::ValidationError(format!("{} cannot be negative: {}", what, n)));
    }
    Ok(n.to_string())
}

/// Realm function and arguments for an admin command.
pub fn admin_call(command: &AdminCommand) -> Result<(&'static str, Vec<String>), GooError> {
    Ok(match command {
        AdminCommand::SetResolutionDuration { seconds } => (
            "SetResolutionDuration",
            vec![non_negative("duration", *seconds)?],
        ),
        // The realm spells it with a lowercase `r`.
        AdminCommand::SetReward { amount } => {
            ("SetrequesterReward", vec![non_negative("reward", *amount)?])
        }
        AdminCommand::SetBond { amount } => ("SetBond", vec![non_negative("bond", *amount)?]),
        AdminCommand::ChangeAdmin { address } => {
            let address = address.trim();
            if !address.starts_with("g1") || address.contains(char::is_whitespace) {
                return Err(GooError::ValidationError(format!(
                    "'{}' is not a valid address",
                    address
                )));
            }
            ("ChangeAdmin", vec![address.to_string()])
        }
    })
}

pub fn run_admin_cli(realm: &dyn Realm, cli: AdminCli) -> Result<(), GooError> {
    let (func, args) = admin_call(&cli.command)?;
    output::warning("This operation requires admin privileges!");
    if let AdminCommand::ChangeAdmin { address } = &cli.command {
        output::warning(&format!("You are transferring admin rights to: {}", address.trim()));
    }
    realm.call(func, &args, None)?;

    match cli.command {
        AdminCommand::SetResolutionDuration { seconds } => {
            output::success("Resolution duration updated!");
            output::info(&format!(
                "New duration: {} seconds ({})",
                seconds,
                time::format_duration(Duration::from_secs(seconds.unsigned_abs()))
            ));
        }
        AdminCommand::SetReward { amount } => {
            output::success("Requester reward updated!");
            output::info(&format!("New reward: {}", output::format_ugnot(amount)));
        }
        AdminCommand::SetBond { amount } => {
            output::success("Bond amount updated!");
            output::info(&format!("New bond: {}", output::format_ugnot(amount)));
        }
        AdminCommand::ChangeAdmin { address } => {
            output::success("Admin changed successfully!");
            output::info(&format!("New admin: {}", address.trim()));
        }
    }
    Ok(())
}
