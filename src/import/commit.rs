//! Applies a confirmed import plan to a portfolio.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::ledger::recalculate_holding;
use crate::models::{AssetType, Holding, Id, IdGenerator, Portfolio, Transaction};

use super::reconcile::{ImportPlan, ImportSummary};

/// What a commit produced, for reporting and follow-up recalculation checks.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub summary: ImportSummary,
    /// Ids of holdings created by this commit, in plan order.
    pub created_holding_ids: Vec<Id>,
    /// Every holding the commit touched (created or appended to).
    pub affected_holding_ids: Vec<Id>,
}

/// Commits a plan: creates holdings for new symbols, appends every staged
/// transaction bound to its resolved holding id, then recalculates each
/// affected holding once.
///
/// Writes land sequentially, holding by holding, so partial progress is
/// observable; callers gate re-entrancy so two commits never interleave on
/// one portfolio. Imported rows are broker facts and are appended as-is;
/// oversell checking applies to manual entry, not to replayed history.
pub fn commit_import(
    portfolio: &mut Portfolio,
    plan: &ImportPlan,
    ids: &dyn IdGenerator,
) -> ImportOutcome {
    let mut resolved: BTreeMap<String, Id> = plan.matched.clone();
    let mut created_holding_ids = Vec::with_capacity(plan.new_holdings.len());

    for planned in &plan.new_holdings {
        // New holdings start as plain stocks with zeroed derived fields;
        // recalculation below fills the position in.
        let holding =
            Holding::new_with_generator(ids, &planned.symbol, &planned.name, AssetType::Stock);
        let id = holding.id.clone();
        match portfolio.add_holding(holding) {
            Ok(_) => {
                resolved.insert(planned.symbol.clone(), id.clone());
                created_holding_ids.push(id);
            }
            Err(_) => {
                // Plan built against an older snapshot; fold into the
                // holding that appeared meanwhile instead of duplicating.
                if let Some(existing) = portfolio.holding_by_symbol(&planned.symbol) {
                    debug!(symbol = %planned.symbol, "symbol appeared since planning; reusing");
                    resolved.insert(planned.symbol.clone(), existing.id.clone());
                }
            }
        }
    }

    let mut affected_holding_ids: Vec<Id> = Vec::new();
    for staged in &plan.staged {
        let Some(holding_id) = resolved.get(&staged.symbol) else {
            continue;
        };
        portfolio.transactions.push(Transaction::new_with_generator(
            ids,
            holding_id.clone(),
            staged.kind,
            staged.date.clone(),
            staged.shares,
            staged.price,
            staged.total,
        ));
        if !affected_holding_ids.contains(holding_id) {
            affected_holding_ids.push(holding_id.clone());
        }
    }

    for holding_id in &affected_holding_ids {
        recalculate_holding(portfolio, holding_id);
    }

    let summary = plan.summary();
    info!(
        portfolio = %portfolio.id,
        new_holdings = summary.new_holding_count,
        transactions = summary.transaction_count,
        skipped = summary.skipped_rows.len(),
        "import committed"
    );

    ImportOutcome {
        summary,
        created_holding_ids,
        affected_holding_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::reconcile::plan_import;
    use crate::import::sheet::sheet_from_csv_reader;
    use crate::import::stage::ActivityVocabulary;
    use crate::models::UuidIdGenerator;
    use rust_decimal_macros::dec;

    const EXPORT: &str = "\
Transaction Date,Action,Symbol,Description,Quantity,Price,Amount
01/02/2024,Bought,AAPL,APPLE INC,10,150,-1500
01/06/2024,Sold,AAPL,APPLE INC,-4,200,800
01/03/2024,Bought,VTI,VANGUARD TOTAL STOCK MARKET ETF,5,220,-1100
";

    fn plan_for(portfolio: &Portfolio) -> ImportPlan {
        let sheet = sheet_from_csv_reader(EXPORT.as_bytes()).unwrap();
        plan_import(&sheet, portfolio, &ActivityVocabulary::default()).unwrap()
    }

    #[test]
    fn commit_creates_holdings_and_recalculates_positions() {
        let mut portfolio = Portfolio::new("Main");
        let plan = plan_for(&portfolio);
        let outcome = commit_import(&mut portfolio, &plan, &UuidIdGenerator);

        assert_eq!(outcome.created_holding_ids.len(), 2);
        assert_eq!(outcome.affected_holding_ids.len(), 2);
        assert_eq!(portfolio.holdings.len(), 2);
        assert_eq!(portfolio.transactions.len(), 3);

        let apple = portfolio.holding_by_symbol("AAPL").unwrap();
        assert_eq!(apple.shares, dec!(6));
        assert_eq!(apple.average_cost, dec!(150));
        assert_eq!(apple.asset_type, AssetType::Stock);

        let vti = portfolio.holding_by_symbol("VTI").unwrap();
        assert_eq!(vti.shares, dec!(5));
        assert_eq!(vti.average_cost, dec!(220));
    }

    #[test]
    fn commit_attaches_to_existing_holdings_without_duplicating() {
        let mut portfolio = Portfolio::new("Main");
        let existing = Holding::new("AAPL", "Apple Inc", AssetType::Stock);
        let existing_id = existing.id.clone();
        portfolio.add_holding(existing).unwrap();

        let plan = plan_for(&portfolio);
        let outcome = commit_import(&mut portfolio, &plan, &UuidIdGenerator);

        // AAPL already tracked: only VTI is new.
        assert_eq!(outcome.created_holding_ids.len(), 1);
        assert_eq!(portfolio.holdings.len(), 2);
        let apple_txns = portfolio.transactions_for(&existing_id);
        assert_eq!(apple_txns.len(), 2);
        assert_eq!(portfolio.holding(&existing_id).unwrap().shares, dec!(6));
    }

    #[test]
    fn committing_a_second_identical_file_creates_no_new_holdings() {
        let mut portfolio = Portfolio::new("Main");
        let first = plan_for(&portfolio);
        commit_import(&mut portfolio, &first, &UuidIdGenerator);

        let second = plan_for(&portfolio);
        let outcome = commit_import(&mut portfolio, &second, &UuidIdGenerator);

        assert!(outcome.created_holding_ids.is_empty());
        assert_eq!(portfolio.holdings.len(), 2);
        assert_eq!(portfolio.transactions.len(), 6);
        // Positions reflect the doubled ledger.
        assert_eq!(
            portfolio.holding_by_symbol("AAPL").unwrap().shares,
            dec!(12)
        );
    }
}
