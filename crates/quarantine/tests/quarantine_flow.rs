//! End-to-end quarantine flows through a bank with the restriction wired in

use std::sync::Arc;

use coinguard_bank::{Bank, BankError, BankKeeper};
use coinguard_core::{Address, BlockHeader, Coins, Context, MemStore};
use coinguard_quarantine::{
    check_holder_balance, AutoResponse, HolderLockedCoins, MsgAccept, MsgDecline, MsgOptIn,
    QuarantineKeeper, QuarantineMsg, QuarantineSendRestriction,
};

fn addr(b: u8) -> Address {
    Address::new(vec![b; 20]).unwrap()
}

fn coins(s: &str) -> Coins {
    s.parse().unwrap()
}

fn setup() -> (QuarantineKeeper, Bank) {
    let keeper = QuarantineKeeper::new(Address::module("quarantine"));
    let mut bank = Bank::new();
    bank.append_send_restriction(Arc::new(QuarantineSendRestriction::new(keeper.clone())));
    bank.append_locked_coins_lookup(Arc::new(HolderLockedCoins::new(keeper.clone())));
    (keeper, bank)
}

#[test]
fn test_fish_scenario() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let (keeper, bank) = setup();
    let (sender, target, other) = (addr(0x5), addr(0x7), addr(0x9));

    bank.mint_coins(&mut ctx, &sender, &coins("1000fish"))?;
    keeper.handle(
        &mut ctx,
        &bank,
        &QuarantineMsg::OptIn(MsgOptIn {
            to_address: target.clone(),
        }),
    )?;

    bank.send_coins(&mut ctx, &sender, &target, &coins("100fish"))?;
    bank.send_coins(&mut ctx, &sender, &target, &coins("100fish"))?;
    bank.send_coins(&mut ctx, &sender, &other, &coins("50fish"))?;

    let record = keeper.get_quarantine_record(&ctx, &target, &sender)?.unwrap();
    assert_eq!(record.coins, coins("200fish"));
    assert!(!record.declined);
    assert!(bank.get_all_balances(&ctx, &target)?.is_zero());
    assert_eq!(bank.get_all_balances(&ctx, keeper.holder())?, coins("200fish"));
    assert_eq!(bank.get_all_balances(&ctx, &other)?, coins("50fish"));
    assert!(keeper.get_quarantine_record(&ctx, &other, &sender)?.is_none());
    check_holder_balance(&keeper, &ctx, &bank)?;

    keeper.handle(
        &mut ctx,
        &bank,
        &QuarantineMsg::Accept(MsgAccept {
            to_address: target.clone(),
            from_addresses: vec![sender.clone()],
            permanent: false,
        }),
    )?;

    assert_eq!(bank.get_all_balances(&ctx, &target)?, coins("200fish"));
    assert!(keeper.get_quarantine_record(&ctx, &target, &sender)?.is_none());
    assert!(bank.get_all_balances(&ctx, keeper.holder())?.is_zero());
    assert_eq!(bank.get_all_balances(&ctx, &sender)?, coins("750fish"));
    check_holder_balance(&keeper, &ctx, &bank)?;
    Ok(())
}

#[test]
fn test_declined_funds_stay_in_escrow() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let (keeper, bank) = setup();
    let (sender, target) = (addr(1), addr(2));

    bank.mint_coins(&mut ctx, &sender, &coins("100fish"))?;
    keeper.set_opt_in(&mut ctx, &target)?;
    bank.send_coins(&mut ctx, &sender, &target, &coins("40fish"))?;

    keeper.handle(
        &mut ctx,
        &bank,
        &QuarantineMsg::Decline(MsgDecline {
            to_address: target.clone(),
            from_addresses: vec![sender.clone()],
            permanent: false,
        }),
    )?;
    bank.send_coins(&mut ctx, &sender, &target, &coins("10fish"))?;

    let record = keeper.get_quarantine_record(&ctx, &target, &sender)?.unwrap();
    assert_eq!(record.coins, coins("50fish"));
    assert!(record.declined);
    assert_eq!(bank.get_all_balances(&ctx, keeper.holder())?, coins("50fish"));

    // a declined record can still be accepted later
    keeper.accept(&mut ctx, &bank, &target, &[sender.clone()], false)?;
    assert_eq!(bank.get_all_balances(&ctx, &target)?, coins("50fish"));
    check_holder_balance(&keeper, &ctx, &bank)?;
    Ok(())
}

#[test]
fn test_permanent_accept_lets_later_funds_through() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let (keeper, bank) = setup();
    let (sender, target) = (addr(1), addr(2));

    bank.mint_coins(&mut ctx, &sender, &coins("100fish"))?;
    keeper.set_opt_in(&mut ctx, &target)?;
    bank.send_coins(&mut ctx, &sender, &target, &coins("30fish"))?;
    keeper.accept(&mut ctx, &bank, &target, &[sender.clone()], true)?;
    assert_eq!(
        keeper.get_auto_response(&ctx, &target, &sender)?,
        AutoResponse::Accept
    );

    bank.send_coins(&mut ctx, &sender, &target, &coins("20fish"))?;
    assert_eq!(bank.get_all_balances(&ctx, &target)?, coins("50fish"));
    assert!(keeper.get_quarantine_record(&ctx, &target, &sender)?.is_none());
    Ok(())
}

#[test]
fn test_auto_decline_records_declined() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let (keeper, bank) = setup();
    let (sender, target) = (addr(1), addr(2));

    bank.mint_coins(&mut ctx, &sender, &coins("100fish"))?;
    keeper.set_opt_in(&mut ctx, &target)?;
    keeper.set_auto_response(&mut ctx, &target, &sender, AutoResponse::Decline)?;
    bank.send_coins(&mut ctx, &sender, &target, &coins("25fish"))?;

    let record = keeper.get_quarantine_record(&ctx, &target, &sender)?.unwrap();
    assert!(record.declined);
    assert_eq!(record.coins, coins("25fish"));
    Ok(())
}

#[test]
fn test_holder_escrow_is_not_spendable() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let (keeper, bank) = setup();
    let (sender, target) = (addr(1), addr(2));

    bank.mint_coins(&mut ctx, &sender, &coins("100fish"))?;
    keeper.set_opt_in(&mut ctx, &target)?;
    bank.send_coins(&mut ctx, &sender, &target, &coins("60fish"))?;

    assert!(bank.spendable_coins(&ctx, keeper.holder())?.is_zero());
    let err = bank
        .send_coins(&mut ctx, &keeper.holder().clone(), &sender, &coins("60fish"))
        .unwrap_err();
    assert!(matches!(err, BankError::InsufficientFunds { .. }));
    Ok(())
}

#[test]
fn test_opt_out_keeps_existing_records() -> anyhow::Result<()> {
    let mut store = MemStore::new();
    let mut ctx = Context::new(&mut store, BlockHeader::default());
    let (keeper, bank) = setup();
    let (sender, target) = (addr(1), addr(2));

    bank.mint_coins(&mut ctx, &sender, &coins("100fish"))?;
    keeper.set_opt_in(&mut ctx, &target)?;
    bank.send_coins(&mut ctx, &sender, &target, &coins("10fish"))?;
    keeper.set_opt_out(&mut ctx, &target)?;
    bank.send_coins(&mut ctx, &sender, &target, &coins("5fish"))?;

    assert_eq!(bank.get_all_balances(&ctx, &target)?, coins("5fish"));
    let record = keeper.get_quarantine_record(&ctx, &target, &sender)?.unwrap();
    assert_eq!(record.coins, coins("10fish"));
    Ok(())
}
