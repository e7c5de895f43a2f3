//! End-to-end scenarios through GuardApp

use coinguard_app::{AppError, GenesisState, GuardApp, GuardConfig, Msg};
use coinguard_core::{
    Address, AnyMsg, BlockHeader, Coins, Context, GovHooks, MemGov, MemStore, Proposal, ProposalStatus,
};
use coinguard_quarantine::{MsgAccept, MsgOptIn, QuarantineMsg, QuarantinedFunds};
use coinguard_sanction::{MsgSanction, SanctionMsg, CODE_SANCTIONED, MSG_SANCTION_TYPE_URL};

fn addr(b: u8) -> Address {
    Address::new(vec![b; 20]).unwrap()
}

fn coins(s: &str) -> Coins {
    s.parse().unwrap()
}

fn app_with_threshold(threshold: &str) -> GuardApp {
    GuardApp::new(GuardConfig {
        default_immediate_sanction_min_deposit: threshold.to_string(),
        ..GuardConfig::default()
    })
    .unwrap()
}

fn send(from: &Address, to: &Address, amount: &str) -> Msg {
    Msg::Send {
        from: from.clone(),
        to: to.clone(),
        amount: coins(amount),
    }
}

#[test]
fn test_fish_scenario() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let app = GuardApp::new(GuardConfig::default())?;
    let (s, t, u) = (addr(0x5), addr(0x7), addr(0x9));
    let holder = app.quarantine().holder().clone();

    app.bank().mint_coins(&mut ctx, &s, &coins("500fish"))?;
    app.deliver(
        &mut ctx,
        &Msg::Quarantine {
            msg: QuarantineMsg::OptIn(MsgOptIn { to_address: t.clone() }),
        },
    )?;

    app.deliver(&mut ctx, &send(&s, &t, "100fish"))?;
    app.deliver(&mut ctx, &send(&s, &t, "100fish"))?;
    app.deliver(&mut ctx, &send(&s, &u, "50fish"))?;

    let (funds, _) = app.quarantine().quarantined_funds(&ctx, &t, None, None)?;
    assert_eq!(
        funds,
        vec![QuarantinedFunds {
            to_address: t.clone(),
            from_address: s.clone(),
            coins: coins("200fish"),
            declined: false,
        }]
    );
    assert_eq!(app.balances(&ctx, &u)?, coins("50fish"));
    assert!(app.quarantine().quarantined_funds(&ctx, &u, None, None)?.0.is_empty());
    let holder_before = app.balances(&ctx, &holder)?;
    assert_eq!(holder_before, coins("200fish"));
    app.check_invariants(&ctx)?;

    let t_before = app.balances(&ctx, &t)?;
    app.deliver(
        &mut ctx,
        &Msg::Quarantine {
            msg: QuarantineMsg::Accept(MsgAccept {
                to_address: t.clone(),
                from_addresses: vec![s.clone()],
                permanent: false,
            }),
        },
    )?;

    assert_eq!(app.balances(&ctx, &t)?, t_before.checked_add(&coins("200fish"))?);
    assert!(app.quarantine().get_quarantine_record(&ctx, &t, &s)?.is_none());
    assert_eq!(
        holder_before.checked_sub(&app.balances(&ctx, &holder)?),
        Some(coins("200fish"))
    );
    app.check_invariants(&ctx)?;
    Ok(())
}

#[test]
fn test_proposal_42_scenario() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let app = app_with_threshold("5stake");
    let (a, b) = (addr(0xa), addr(0xb));
    app.bank().mint_coins(&mut ctx, &a, &coins("100fish"))?;

    let mut gov = MemGov::new();
    let msg = MsgSanction {
        addresses: vec![a.clone()],
        authority: app.sanction().authority().clone(),
    };
    gov.insert(Proposal {
        id: 42,
        messages: vec![AnyMsg::pack(MSG_SANCTION_TYPE_URL, &msg)?],
        status: ProposalStatus::DepositPeriod,
        total_deposit: coins("10stake"),
    });
    app.gov_hooks(&gov).after_proposal_submission(&mut ctx, 42)?;

    let (entries, _) = app.sanction().temporary_entries(&ctx, Some(&a), None)?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].proposal_id, 42);

    let err = app.deliver(&mut ctx, &send(&a, &b, "10fish")).unwrap_err();
    match err {
        AppError::Bank(coinguard_bank::BankError::Restriction(e)) => {
            assert_eq!(e.code(), Some(CODE_SANCTIONED))
        }
        other => panic!("unexpected error: {other:?}"),
    }

    gov.set_status(42, ProposalStatus::Rejected);
    app.gov_hooks(&gov).after_proposal_voting_period_ended(&mut ctx, 42)?;

    assert!(app.sanction().temporary_entries(&ctx, Some(&a), None)?.0.is_empty());
    app.deliver(&mut ctx, &send(&a, &b, "10fish"))?;
    assert_eq!(app.balances(&ctx, &b)?, coins("10fish"));
    Ok(())
}

#[test]
fn test_deleted_proposal_lifts_temporary_sanction() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let app = app_with_threshold("5stake");
    let (a, b) = (addr(0xa), addr(0xb));
    app.bank().mint_coins(&mut ctx, &a, &coins("100fish"))?;

    let mut gov = MemGov::new();
    let msg = MsgSanction {
        addresses: vec![a.clone()],
        authority: app.sanction().authority().clone(),
    };
    gov.insert(Proposal {
        id: 3,
        messages: vec![AnyMsg::pack(MSG_SANCTION_TYPE_URL, &msg)?],
        status: ProposalStatus::DepositPeriod,
        total_deposit: coins("6stake"),
    });
    app.gov_hooks(&gov).after_proposal_submission(&mut ctx, 3)?;
    assert!(app.deliver(&mut ctx, &send(&a, &b, "10fish")).is_err());

    // min deposit never reached: governance drops the proposal
    gov.remove(3);
    app.gov_hooks(&gov).after_proposal_failed_min_deposit(&mut ctx, 3)?;
    assert!(app.sanction().is_blocked(&ctx, &a)?);

    app.on_proposal_deleted(&mut ctx, &gov, 3)?;
    assert!(app.sanction().temporary_entries(&ctx, Some(&a), None)?.0.is_empty());
    assert!(!app.sanction().is_blocked(&ctx, &a)?);
    app.deliver(&mut ctx, &send(&a, &b, "10fish"))?;
    assert_eq!(app.balances(&ctx, &b)?, coins("10fish"));
    Ok(())
}

#[test]
fn test_sanction_runs_before_quarantine() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let app = GuardApp::new(GuardConfig::default())?;
    let (a, t) = (addr(0xa), addr(0x7));
    app.bank().mint_coins(&mut ctx, &a, &coins("100fish"))?;

    app.quarantine().set_opt_in(&mut ctx, &t)?;
    app.deliver(
        &mut ctx,
        &Msg::Sanction {
            msg: SanctionMsg::Sanction(MsgSanction {
                addresses: vec![a.clone()],
                authority: app.sanction().authority().clone(),
            }),
        },
    )?;

    assert!(app.deliver(&mut ctx, &send(&a, &t, "10fish")).is_err());
    assert!(app.quarantine().get_quarantine_record(&ctx, &a, &t)?.is_none());
    assert!(app.quarantine().get_quarantine_record(&ctx, &t, &a)?.is_none());
    assert_eq!(app.balances(&ctx, &a)?, coins("100fish"));
    Ok(())
}

#[test]
fn test_quarantine_release_to_sanctioned_recipient() -> anyhow::Result<()> {
    // releasing comes from the holder, which is never sanctioned
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let app = GuardApp::new(GuardConfig::default())?;
    let (s, t) = (addr(0x5), addr(0x7));
    app.bank().mint_coins(&mut ctx, &s, &coins("10fish"))?;
    app.quarantine().set_opt_in(&mut ctx, &t)?;
    app.deliver(&mut ctx, &send(&s, &t, "10fish"))?;
    app.sanction().sanction_addresses(&mut ctx, &[t.clone()])?;

    app.quarantine()
        .accept(&mut ctx, app.bank(), &t, &[s.clone()], false)?;
    assert_eq!(app.balances(&ctx, &t)?, coins("10fish"));
    Ok(())
}

#[test]
fn test_rejected_message_discards_writes() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let app = GuardApp::new(GuardConfig::default())?;
    let authority = app.sanction().authority().clone();

    // the second address is exempt, so nothing may be written
    let err = app
        .deliver(
            &mut ctx,
            &Msg::Sanction {
                msg: SanctionMsg::Sanction(MsgSanction {
                    addresses: vec![addr(1), app.quarantine().holder().clone()],
                    authority,
                }),
            },
        )
        .unwrap_err();
    assert!(!err.is_fatal());
    assert!(!app.sanction().is_sanctioned(&ctx, &addr(1)));
    assert!(ctx.events().is_empty());
    Ok(())
}

#[test]
fn test_wrong_authority() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let app = GuardApp::new(GuardConfig::default())?;

    let err = app
        .deliver(
            &mut ctx,
            &Msg::Sanction {
                msg: SanctionMsg::Sanction(MsgSanction {
                    addresses: vec![addr(1)],
                    authority: addr(2),
                }),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Sanction(coinguard_sanction::SanctionError::InvalidAuthority { .. })
    ));
    Ok(())
}

#[test]
fn test_missing_proposal_halts() {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let app = GuardApp::new(GuardConfig::default()).unwrap();
    let gov = MemGov::new();

    let err = app
        .gov_hooks(&gov)
        .after_proposal_deposit(&mut ctx, 5, &addr(1))
        .unwrap_err();
    let err: AppError = err.into();
    assert!(err.is_fatal());
}

#[test]
fn test_genesis_roundtrip() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let app = app_with_threshold("5stake");
    let (s, t) = (addr(0x5), addr(0x7));

    app.bank().mint_coins(&mut ctx, &s, &coins("30fish"))?;
    app.quarantine().set_opt_in(&mut ctx, &t)?;
    app.deliver(&mut ctx, &send(&s, &t, "30fish"))?;
    app.sanction().sanction_addresses(&mut ctx, &[addr(0xc)])?;
    let exported = app.export_genesis(&ctx)?;

    let json = serde_json::to_string(&exported)?;
    let parsed: GenesisState = serde_json::from_str(&json)?;
    assert_eq!(parsed, exported);

    // replay into a fresh store whose bank already holds the escrow
    let mut fresh = MemStore::new();
    let mut fresh_ctx = Context::new(&mut fresh, BlockHeader::default());
    let holder = app.quarantine().holder().clone();
    app.bank().mint_coins(&mut fresh_ctx, &holder, &coins("30fish"))?;
    app.init_genesis(&mut fresh_ctx, &parsed)?;
    assert_eq!(app.export_genesis(&fresh_ctx)?, exported);
    app.check_invariants(&fresh_ctx)?;
    Ok(())
}
