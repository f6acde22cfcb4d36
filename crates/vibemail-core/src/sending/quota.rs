//! Account daily quota accounting

use chrono::NaiveDate;
use vibemail_storage::models::EmailAccount;

/// Reset `sent_today` for accounts whose counter belongs to an earlier day.
///
/// Accounts that were never charged carry no day and are left alone.
/// Returns the number of accounts reset.
pub fn reset_stale(accounts: &mut [EmailAccount], today: NaiveDate) -> usize {
    let mut reset = 0;
    for account in accounts.iter_mut() {
        match account.quota_date {
            Some(day) if day < today => {
                account.sent_today = 0;
                account.quota_date = Some(today);
                reset += 1;
            }
            _ => {}
        }
    }
    reset
}

fn charge(account: &mut EmailAccount, today: NaiveDate) {
    account.sent_today += 1;
    account.quota_date = Some(today);
}

/// Charge one send to every sendable account.
///
/// Returns the number of accounts charged.
pub fn charge_per_tick(accounts: &mut [EmailAccount], today: NaiveDate) -> usize {
    let mut charged = 0;
    for account in accounts.iter_mut().filter(|a| a.is_sendable()) {
        charge(account, today);
        charged += 1;
    }
    charged
}

/// Charge `emails` sends round-robin across sendable accounts.
///
/// Stops early once every account reached its ceiling. Returns the number of
/// distinct accounts charged and the number of sends charged.
pub fn charge_per_email(
    accounts: &mut [EmailAccount],
    emails: u32,
    today: NaiveDate,
) -> (usize, u32) {
    let mut charged = vec![false; accounts.len()];
    let mut remaining = emails;

    while remaining > 0 {
        let mut progressed = false;
        for (index, account) in accounts.iter_mut().enumerate() {
            if remaining == 0 {
                break;
            }
            if account.is_sendable() {
                charge(account, today);
                charged[index] = true;
                remaining -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    (
        charged.iter().filter(|c| **c).count(),
        emails - remaining,
    )
}
