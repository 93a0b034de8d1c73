//! End-to-end walkthrough: committee mint, deposit, credential verification

use credential_ledger::utils::MemoryStorage;
use credential_ledger::{
    format_units, parse_ether, Address, CredentialHash, CredentialRegistry, DeploymentConfig,
    Ledger, DECIMALS,
};
use tracing_subscriber::EnvFilter;

const DEPLOYMENT: &str = r#"{
    "ledger": {
        "address": "0x00000000000000000000000000000000000000aa",
        "name": "Group 8 Token",
        "symbol": "G8TK",
        "approvers": [
            "0xBD825F9D06Ff5213c325D7Bcd63CafCCf49294D3",
            "0x05f508f08713F9602ada77D4cCD55E2C91715211",
            "0xc1A6b651f7E0B5dc6A3bd235C05e9b8f3d46C25f"
        ]
    },
    "registry": {
        "address": "0x00000000000000000000000000000000000000bb",
        "owner": "0x00000000000000000000000000000000000000cc",
        "ledger_address": "0x00000000000000000000000000000000000000aa",
        "fee": "1"
    }
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("Credential Ledger - walkthrough\n");

    let config = DeploymentConfig::from_json_str(DEPLOYMENT)?;
    let registry_config = config
        .registry
        .as_ref()
        .ok_or("deployment has no registry section")?;

    let mut ledger = Ledger::from_config(MemoryStorage::new(), &config.ledger)?;
    let mut registry = CredentialRegistry::from_config(registry_config)?;
    println!(
        "Deployed {} ({}) at {}",
        ledger.name(),
        ledger.symbol(),
        ledger.address()
    );
    println!(
        "Registry at {} with fee {} {}\n",
        registry.address(),
        format_units(registry.fee(), DECIMALS),
        ledger.symbol()
    );

    // 1. The committee completes a mint round
    for approver in config.ledger.approvers.iter() {
        let outcome = ledger.approve_mint(approver).await?;
        println!("  approve_mint by {} -> {:?}", approver, outcome);
    }
    let rewarded = config.ledger.approvers[2];
    println!(
        "  {} now holds {} tokens\n",
        rewarded,
        format_units(ledger.balance_of(&rewarded).await?, DECIMALS)
    );

    // 2. A student buys tokens with native currency
    let student: Address = "0x00000000000000000000000000000000000000dd".parse()?;
    ledger
        .receive(&student, parse_ether("0.01")?, &[])
        .await?;
    println!(
        "  student bought {} tokens for 0.01 native\n",
        format_units(ledger.balance_of(&student).await?, DECIMALS)
    );

    // 3. The owner stores a credential; the student pays to verify it
    let owner = registry.owner();
    let hash = CredentialHash::digest("UBa education diploma #42");
    registry.store_credential(&owner, hash)?;
    ledger
        .approve(&student, &registry.address(), registry.fee())
        .await?;
    registry
        .verify_credential(&mut ledger, &student, hash)
        .await?;
    println!("  credential {} verified: {}", hash, registry.is_verified(&hash));

    // 4. The owner collects the fee
    let fee = registry.fee();
    registry.withdraw_tokens(&mut ledger, &owner, fee).await?;
    println!(
        "  owner balance: {} tokens\n",
        format_units(ledger.balance_of(&owner).await?, DECIMALS)
    );

    let report = ledger.audit_supply().await?;
    println!(
        "Total supply {} across {} accounts (consistent: {})",
        format_units(report.total_supply, DECIMALS),
        report.accounts,
        report.is_consistent
    );

    Ok(())
}
