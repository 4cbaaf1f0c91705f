use std::sync::Arc;

use courier_config::{CompanyConfig, Config, OrderConfig, OrderStatus};
use courier_core::{AppError, Forbidden, ModelNotFound, Partner, Raised};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;

/// Shared state handed to the partner API handlers
#[derive(Clone)]
pub struct AppState {
    pub company: Arc<CompanyConfig>,
    pub orders: OrderBook,
    pub bank_accounts: BankAccounts,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            company: Arc::new(config.company.clone()),
            orders: OrderBook::from_config(&config.orders),
            bank_accounts: BankAccounts::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: u64,
    pub partner_id: u64,
    pub pickup_address: String,
    pub drop_address: String,
    pub status: OrderStatus,
}

impl From<&OrderConfig> for Order {
    fn from(config: &OrderConfig) -> Self {
        Self {
            id: config.id,
            partner_id: config.partner_id,
            pickup_address: config.pickup_address.clone(),
            drop_address: config.drop_address.clone(),
            status: config.status,
        }
    }
}

/// In-memory orders keyed by id
#[derive(Clone, Default)]
pub struct OrderBook {
    orders: Arc<DashMap<u64, Order>>,
}

impl OrderBook {
    pub fn from_config(orders: &[OrderConfig]) -> Self {
        let book = Self::default();
        for order in orders {
            book.orders.insert(order.id, Order::from(order));
        }
        book
    }

    /// Order `id`, provided it is assigned to `partner`
    #[track_caller]
    pub fn assigned(&self, id: u64, partner: &Partner) -> Result<Order, Raised> {
        let Some(order) = self.orders.get(&id).map(|entry| entry.value().clone()) else {
            return Err(Raised::new(ModelNotFound::new("Order", id)));
        };

        ensure_assigned(&order, partner)?;
        Ok(order)
    }

    /// Move a pending order assigned to `partner` to accepted
    #[track_caller]
    pub fn accept(&self, id: u64, partner: &Partner) -> Result<Order, Raised> {
        let Some(mut order) = self.orders.get_mut(&id) else {
            return Err(Raised::new(ModelNotFound::new("Order", id)));
        };

        ensure_assigned(&order, partner)?;

        let status = order.status;
        match status {
            OrderStatus::Pending => {
                order.status = OrderStatus::Accepted;
                tracing::info!(order_id = id, partner_id = partner.id, "order accepted");
                Ok(order.clone())
            }
            OrderStatus::Accepted => Err(Raised::new(
                AppError::conflict("Order has already been accepted").with_detail("order", "accepted"),
            )),
            OrderStatus::Delivered => Err(Raised::new(
                AppError::conflict("Order has already been delivered").with_detail("order", "delivered"),
            )),
        }
    }
}

#[track_caller]
fn ensure_assigned(order: &Order, partner: &Partner) -> Result<(), Raised> {
    if order.partner_id == partner.id {
        Ok(())
    } else {
        Err(Raised::new(Forbidden::new("This order is not assigned to you")))
    }
}

/// Payout account registered by a partner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc: String,
}

/// Client view of a [`BankAccount`]; the account number is masked
#[derive(Debug, Serialize)]
pub struct BankAccountView {
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc: String,
}

impl From<&BankAccount> for BankAccountView {
    fn from(account: &BankAccount) -> Self {
        let visible = account.account_number.len().saturating_sub(4);
        Self {
            account_holder_name: account.account_holder_name.clone(),
            account_number: format!("{}{}", "X".repeat(visible), &account.account_number[visible..]),
            ifsc: account.ifsc.clone(),
        }
    }
}

/// Account number and IFSC identifying one real bank account
type AccountKey = (String, String);

/// Bank accounts keyed by partner id
///
/// `owners` maps each linked account to its partner. Claims go through
/// `DashMap::entry`, so two partners racing for one account cannot both win.
#[derive(Clone, Default)]
pub struct BankAccounts {
    accounts: Arc<DashMap<u64, BankAccount>>,
    owners: Arc<DashMap<AccountKey, u64>>,
}

impl BankAccounts {
    #[track_caller]
    pub fn get(&self, partner: &Partner) -> Result<BankAccount, Raised> {
        match self.accounts.get(&partner.id) {
            Some(entry) => Ok(entry.value().clone()),
            None => Err(Raised::new(ModelNotFound::new("BankAccount", partner.id))),
        }
    }

    /// Store or replace the partner's account
    ///
    /// The same account number and IFSC cannot be linked to two partners.
    #[track_caller]
    pub fn save(&self, partner: &Partner, account: BankAccount) -> Result<BankAccount, Raised> {
        let key = account_key(&account);

        match self.owners.entry(key.clone()) {
            Entry::Occupied(owner) if *owner.get() != partner.id => {
                return Err(Raised::new(
                    AppError::conflict("Bank account is already linked to another partner")
                        .with_detail("account_number", "This account is already in use."),
                ));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(partner.id);
            }
        }

        if let Some(previous) = self.accounts.insert(partner.id, account.clone()) {
            let previous = account_key(&previous);
            if previous != key {
                self.owners.remove_if(&previous, |_, owner| *owner == partner.id);
            }
        }

        tracing::info!(partner_id = partner.id, "bank account saved");
        Ok(account)
    }
}

fn account_key(account: &BankAccount) -> AccountKey {
    (account.account_number.clone(), account.ifsc.clone())
}
