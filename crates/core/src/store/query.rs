//! Transaction filters, ordering and pagination.
//!
//! Stores are free to push these down into their own query language; the
//! in-memory implementations use [`TransactionQuery::select`] and
//! [`TransactionPage::paginate`] directly.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::UserId;

use crate::budget::period::Period;
use crate::transaction::{Transaction, TransactionKind};

/// Field a transaction listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Transaction date.
    #[default]
    Date,
    /// Absolute amount.
    Amount,
    /// Category name.
    Category,
    /// Description text.
    Description,
}

impl SortField {
    /// Reads the `sort` query value; absent or unknown values mean `date`.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("amount") => Self::Amount,
            Some("category") => Self::Category,
            Some("description") => Self::Description,
            _ => Self::Date,
        }
    }
}

/// Direction of a transaction listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest (newest) first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Reads the `order` query value. Absent means `desc`; anything other
    /// than `desc` means ascending.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if !s.trim().eq_ignore_ascii_case("desc") => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// Filter and ordering for transaction lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Owning user.
    pub user_id: UserId,
    /// Exact category match.
    pub category: Option<String>,
    /// Earliest date, inclusive.
    pub from: Option<DateTime<Utc>>,
    /// Latest date, inclusive.
    pub to: Option<DateTime<Utc>>,
    /// Transaction kind.
    pub kind: Option<TransactionKind>,
    /// Smallest absolute amount, inclusive.
    pub min_amount: Option<Decimal>,
    /// Largest absolute amount, inclusive.
    pub max_amount: Option<Decimal>,
    /// Ordering field.
    pub sort: SortField,
    /// Ordering direction.
    pub order: SortOrder,
}

impl TransactionQuery {
    /// All transactions of `user_id`, newest first.
    #[must_use]
    pub const fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            category: None,
            from: None,
            to: None,
            kind: None,
            min_amount: None,
            max_amount: None,
            sort: SortField::Date,
            order: SortOrder::Desc,
        }
    }

    /// Restricts to one category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts to dates inside `period`.
    #[must_use]
    pub const fn within(mut self, period: Period) -> Self {
        self.from = Some(period.start);
        self.to = Some(period.end);
        self
    }

    /// Restricts to dates at or after `from`.
    #[must_use]
    pub const fn since(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    /// Restricts to dates at or before `to`.
    #[must_use]
    pub const fn until(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    /// Restricts to one kind.
    #[must_use]
    pub const fn of_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts to absolute amounts within the given bounds.
    #[must_use]
    pub const fn amount_between(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn sorted_by(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    /// Returns true if `tx` passes every filter.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        let magnitude = tx.magnitude();
        tx.user_id == self.user_id
            && self.category.as_ref().is_none_or(|c| *c == tx.category)
            && self.from.is_none_or(|from| from <= tx.date)
            && self.to.is_none_or(|to| tx.date <= to)
            && self.kind.is_none_or(|k| k == tx.kind)
            && self.min_amount.is_none_or(|min| min <= magnitude)
            && self.max_amount.is_none_or(|max| magnitude <= max)
    }

    /// Orders two transactions by this query's sort field and direction.
    #[must_use]
    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ascending = match self.sort {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.magnitude().cmp(&b.magnitude()),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Description => a.description.cmp(&b.description),
        };
        match self.order {
            SortOrder::Asc => ascending,
            SortOrder::Desc => ascending.reverse(),
        }
    }

    /// Clones the matching transactions out of `transactions`, ordered.
    /// Ties keep their input order.
    pub fn select<'a, I>(&self, transactions: I) -> Vec<Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut found: Vec<Transaction> = transactions
            .into_iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect();
        found.sort_by(|a, b| self.compare(a, b));
        found
    }
}

/// One page of a listing, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: usize,
    /// Items per page, at least 1.
    pub limit: usize,
}

impl PageRequest {
    /// Items per page when none is asked for.
    pub const DEFAULT_LIMIT: usize = 10;

    /// Creates a request, raising zero page or limit to 1.
    #[must_use]
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Number of items before this page.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_LIMIT)
    }
}

/// A page of transactions with pagination info.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    /// Transactions on this page.
    pub transactions: Vec<Transaction>,
    /// Number of transactions on this page.
    pub count: usize,
    /// Number of transactions matching the query.
    pub total_transactions: usize,
    /// Page number, starting at 1.
    pub current_page: usize,
    /// Number of pages.
    pub total_pages: usize,
    /// A later page exists.
    pub has_next_page: bool,
    /// An earlier page exists.
    pub has_prev_page: bool,
}

impl TransactionPage {
    /// Cuts one page out of every matching transaction.
    #[must_use]
    pub fn paginate(matching: Vec<Transaction>, request: PageRequest) -> Self {
        let total = matching.len();
        let transactions = matching
            .into_iter()
            .skip(request.offset())
            .take(request.limit)
            .collect();
        Self::from_parts(transactions, total, request)
    }

    /// Wraps a page already cut by the store.
    #[must_use]
    pub fn from_parts(transactions: Vec<Transaction>, total: usize, request: PageRequest) -> Self {
        let total_pages = total.div_ceil(request.limit.max(1));
        Self {
            count: transactions.len(),
            transactions,
            total_transactions: total,
            current_page: request.page,
            total_pages,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}
