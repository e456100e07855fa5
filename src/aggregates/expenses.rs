//! Client-local expense ledger. Never persisted.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use super::one_decimal;
use crate::error::{Result, SyncError};

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    pub total_spent: f64,
    pub remaining: f64,
    pub percent_spent: f64,
    pub daily_budget: f64,
    /// Spent divided by the number of distinct expense dates (at least 1).
    pub daily_average: f64,
    pub over_daily_budget: bool,
    /// In order of first appearance.
    pub categories: Vec<CategoryTotal>,
}

/// Expenses logged against a trip budget.
#[derive(Debug, Clone)]
pub struct ExpenseLedger {
    budget: f64,
    duration_days: u32,
    expenses: Vec<Expense>,
}

impl ExpenseLedger {
    pub fn new(budget: f64, duration_days: u32) -> Result<Self> {
        if budget <= 0.0 {
            return Err(SyncError::validation("budget", "Budget must be greater than zero"));
        }
        if duration_days == 0 {
            return Err(SyncError::validation("duration", "Duration must be at least one day"));
        }
        Ok(Self {
            budget,
            duration_days,
            expenses: Vec::new(),
        })
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Log an expense. An empty description falls back to the category.
    pub fn add(
        &mut self,
        category: &str,
        amount: f64,
        description: Option<&str>,
        date: NaiveDate,
    ) -> Result<&Expense> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SyncError::validation("amount", "Please enter a valid amount"));
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(category);

        self.expenses.push(Expense {
            id: Uuid::new_v4(),
            category: category.to_string(),
            amount,
            description: description.to_string(),
            date,
        });
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Remove an expense. Returns whether it existed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }

    pub fn summary(&self) -> ExpenseSummary {
        let total_spent: f64 = self.expenses.iter().map(|e| e.amount).sum();
        let days: HashSet<NaiveDate> = self.expenses.iter().map(|e| e.date).collect();
        let daily_budget = self.budget / f64::from(self.duration_days);
        let daily_average = total_spent / days.len().max(1) as f64;

        let mut categories: Vec<CategoryTotal> = Vec::new();
        for expense in &self.expenses {
            match categories.iter_mut().find(|c| c.category == expense.category) {
                Some(entry) => entry.total += expense.amount,
                None => categories.push(CategoryTotal {
                    category: expense.category.clone(),
                    total: expense.amount,
                }),
            }
        }

        ExpenseSummary {
            total_spent,
            remaining: self.budget - total_spent,
            percent_spent: one_decimal(total_spent / self.budget * 100.0),
            daily_budget,
            daily_average,
            over_daily_budget: daily_average > daily_budget,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, d).unwrap()
    }

    #[test]
    fn test_week_long_trip_same_day_expenses() {
        let mut ledger = ExpenseLedger::new(21000.0, 7).unwrap();
        ledger.add("food", 1000.0, None, day(1)).unwrap();
        ledger.add("transport", 1000.0, Some("Auto"), day(1)).unwrap();

        let summary = ledger.summary();
        assert_eq!(summary.daily_budget, 3000.0);
        assert_eq!(summary.daily_average, 2000.0);
        assert_eq!(summary.remaining, 19000.0);
        assert!(!summary.over_daily_budget);
        assert_eq!(ledger.expenses()[0].description, "food");
    }

    #[test]
    fn test_empty_ledger() {
        let summary = ExpenseLedger::new(5000.0, 2).unwrap().summary();
        assert_eq!(summary.total_spent, 0.0);
        assert_eq!(summary.daily_average, 0.0);
        assert_eq!(summary.remaining, 5000.0);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_category_totals_in_first_appearance_order() {
        let mut ledger = ExpenseLedger::new(6000.0, 3).unwrap();
        ledger.add("accommodation", 2500.0, None, day(1)).unwrap();
        ledger.add("food", 300.0, None, day(1)).unwrap();
        ledger.add("accommodation", 2500.0, None, day(2)).unwrap();

        let summary = ledger.summary();
        assert_eq!(
            summary.categories,
            vec![
                CategoryTotal { category: "accommodation".to_string(), total: 5000.0 },
                CategoryTotal { category: "food".to_string(), total: 300.0 },
            ]
        );
        assert_eq!(summary.daily_average, 2650.0);
        assert!(summary.over_daily_budget);
        assert_eq!(summary.percent_spent, 88.3);
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(ExpenseLedger::new(0.0, 3).unwrap_err().is_inline());
        assert!(ExpenseLedger::new(100.0, 0).is_err());

        let mut ledger = ExpenseLedger::new(100.0, 1).unwrap();
        assert!(ledger.add("food", 0.0, None, day(1)).is_err());
        assert!(ledger.add("food", -5.0, None, day(1)).is_err());
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn test_remove() {
        let mut ledger = ExpenseLedger::new(100.0, 1).unwrap();
        let id = ledger.add("food", 10.0, None, day(1)).unwrap().id;
        assert!(ledger.remove(id));
        assert!(!ledger.remove(id));
        assert_eq!(ledger.summary(), ledger.summary());
    }
}
