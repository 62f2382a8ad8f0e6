// Exhaustive transition-table test for the payout state machine.
//
// Legal edges: pending -> approved, pending -> rejected,
// approved -> completed. Everything else must fail, including re-applying
// an already satisfied transition.

use rust_decimal_macros::dec;

use edupay::core::AppError;
use edupay::modules::payouts::models::{Payout, PayoutStatus};

fn payout_in(status: PayoutStatus) -> Payout {
    let mut payout = Payout::new(
        "inst-1".to_string(),
        dec!(100),
        "teacher@example.com".to_string(),
    )
    .unwrap();

    match status {
        PayoutStatus::Pending => {}
        PayoutStatus::Approved => payout.approve().unwrap(),
        PayoutStatus::Rejected => payout.reject().unwrap(),
        PayoutStatus::Completed => {
            payout.approve().unwrap();
            payout.complete("stl-setup".to_string()).unwrap();
        }
    }
    payout
}

fn apply(payout: &mut Payout, target: PayoutStatus) -> edupay::core::Result<()> {
    match target {
        PayoutStatus::Approved => payout.approve(),
        PayoutStatus::Rejected => payout.reject(),
        PayoutStatus::Completed => payout.complete("stl-apply".to_string()),
        PayoutStatus::Pending => unreachable!("no operation targets pending"),
    }
}

#[test]
fn transition_table_is_exhaustive() {
    let all_states = [
        PayoutStatus::Pending,
        PayoutStatus::Approved,
        PayoutStatus::Rejected,
        PayoutStatus::Completed,
    ];
    let targets = [
        PayoutStatus::Approved,
        PayoutStatus::Rejected,
        PayoutStatus::Completed,
    ];
    let legal = [
        (PayoutStatus::Pending, PayoutStatus::Approved),
        (PayoutStatus::Pending, PayoutStatus::Rejected),
        (PayoutStatus::Approved, PayoutStatus::Completed),
    ];

    for from in all_states {
        for to in targets {
            let mut payout = payout_in(from);
            let result = apply(&mut payout, to);

            if legal.contains(&(from, to)) {
                assert!(result.is_ok(), "{} -> {} should be legal", from, to);
                assert_eq!(payout.status, to);
            } else {
                let err = result.expect_err(&format!("{} -> {} should fail", from, to));
                assert!(
                    matches!(err, AppError::IllegalTransition(_)),
                    "{} -> {} failed with the wrong error kind",
                    from,
                    to
                );
                assert_eq!(payout.status, from, "{} must be unchanged after {}", from, to);
            }
        }
    }
}

#[test]
fn completed_payout_keeps_its_settlement_ref() {
    let mut payout = payout_in(PayoutStatus::Approved);
    payout.complete("stl-42".to_string()).unwrap();
    assert_eq!(payout.settlement_ref.as_deref(), Some("stl-42"));

    // a failing transition afterwards must not clobber it
    assert!(payout.approve().is_err());
    assert_eq!(payout.settlement_ref.as_deref(), Some("stl-42"));
}

#[test]
fn failed_completion_does_not_attach_settlement_ref() {
    let mut payout = payout_in(PayoutStatus::Pending);
    assert!(payout.complete("stl-early".to_string()).is_err());
    assert!(payout.settlement_ref.is_none());
}

#[test]
fn amount_survives_every_transition() {
    let mut payout = payout_in(PayoutStatus::Pending);
    let amount = payout.amount;

    payout.approve().unwrap();
    assert_eq!(payout.amount, amount);
    payout.complete("stl-1".to_string()).unwrap();
    assert_eq!(payout.amount, amount);
}
