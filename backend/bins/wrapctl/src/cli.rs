use anchor_lang::prelude::Pubkey;
use clap::{Args, Parser, Subcommand, ValueEnum};
use wrapped_token::constants::LAMPORTS_PER_TOKEN;
use wrapped_token::state::{LedgerSettings, PayoutOrdering};

#[derive(Debug, Parser)]
#[clap(name = "wrapctl", version, about = "Drive a wrapped token ledger on the in-process runtime")]
pub struct Cli {
    /// Print reports as JSON instead of text.
    #[clap(long, global = true)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay the token lifecycle and report after every step.
    Walkthrough,

    /// Run the reentrant unwrap drain against one ledger configuration.
    Attack(AttackArgs),

    /// Run the walkthrough, then report one holder or any address.
    CheckBalance(CheckBalanceArgs),

    /// Print the effective configuration.
    Config,
}

#[derive(Clone, Debug, Args)]
pub struct AttackArgs {
    /// When the ledger writes balances relative to paying out.
    #[clap(long, value_enum, default_value_t = Ordering::PayoutFirst)]
    pub ordering: Ordering,

    /// Enable the ledger's reentrancy lock.
    #[clap(long)]
    pub guard: bool,

    /// Honest holders, including the attacker's owner.
    #[clap(long, default_value_t = 4, value_parser = clap::value_parser!(u64).range(2..=64))]
    pub holders: u64,

    /// Lamports each holder wraps. The owner stakes the same amount in the attacker.
    #[clap(long, default_value_t = LAMPORTS_PER_TOKEN, value_parser = clap::value_parser!(u64).range(1..))]
    pub stake: u64,

    /// Nested unwraps the attacker attempts per attack.
    #[clap(long, default_value_t = 10)]
    pub max_reentries: u32,
}

impl AttackArgs {
    pub fn settings(&self) -> LedgerSettings {
        LedgerSettings {
            payout_ordering: self.ordering.into(),
            reentrancy_guard: self.guard,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct CheckBalanceArgs {
    /// Index of the generated holder to report.
    #[clap(long, required_unless_present = "address", conflicts_with = "address")]
    pub holder: Option<usize>,

    /// Report this address instead, e.g. the ledger itself.
    #[clap(long)]
    pub address: Option<Pubkey>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, ValueEnum)]
pub enum Ordering {
    #[default]
    EffectsFirst,
    PayoutFirst,
}

impl From<Ordering> for PayoutOrdering {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::EffectsFirst => PayoutOrdering::EffectsFirst,
            Ordering::PayoutFirst => PayoutOrdering::PayoutFirst,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert()
    }

    #[test]
    fn test_attack_defaults() {
        let cli = Cli::parse_from(["wrapctl", "attack"]);
        let Command::Attack(args) = cli.command else {
            panic!("expected attack");
        };
        assert_eq!(args.ordering, Ordering::PayoutFirst);
        assert!(!args.guard);
        assert_eq!(args.holders, 4);
        assert_eq!(args.stake, LAMPORTS_PER_TOKEN);
        assert_eq!(args.settings(), LedgerSettings::unguarded(PayoutOrdering::PayoutFirst));
    }

    #[test]
    fn test_attack_flags() {
        let cli = Cli::parse_from([
            "wrapctl",
            "attack",
            "--ordering",
            "effects-first",
            "--guard",
            "--holders",
            "6",
            "--json",
        ]);
        assert!(cli.json);
        let Command::Attack(args) = cli.command else {
            panic!("expected attack");
        };
        assert_eq!(args.settings(), LedgerSettings::guarded(PayoutOrdering::EffectsFirst));
        assert_eq!(args.holders, 6);
    }

    #[test]
    fn test_check_balance_by_address() {
        let address = Pubkey::new_from_array([3; 32]);
        let cli = Cli::parse_from(["wrapctl", "check-balance", "--address", &address.to_string()]);
        let Command::CheckBalance(args) = cli.command else {
            panic!("expected check-balance");
        };
        assert_eq!(args.address, Some(address));
        assert_eq!(args.holder, None);
    }

    #[test]
    fn test_check_balance_needs_one_account() {
        assert!(Cli::try_parse_from(["wrapctl", "check-balance"]).is_err());
        assert!(Cli::try_parse_from(["wrapctl", "check-balance", "--address", "not-a-key"]).is_err());

        let address = Pubkey::new_from_array([3; 32]).to_string();
        let both = ["wrapctl", "check-balance", "--holder", "0", "--address", address.as_str()];
        assert!(Cli::try_parse_from(both).is_err());
    }

    #[test]
    fn test_single_holder_rejected() {
        assert!(Cli::try_parse_from(["wrapctl", "attack", "--holders", "1"]).is_err());
    }
}
