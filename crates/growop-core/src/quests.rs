//! Quest progress and reward payout.

use growop_market::inventory;
use growop_types::{Inventory, Quest, QuestId, QuestKind, Reward};
use tracing::info;

use crate::error::CoreError;

/// Count `amount` towards every open quest of `kind`. Progress stops at
/// the target.
pub fn advance(quests: &mut [Quest], kind: QuestKind, amount: u64) {
    for quest in quests.iter_mut().filter(|q| q.kind == kind && !q.claimed) {
        quest.progress = quest.progress.saturating_add(amount).min(quest.target);
    }
}

/// Pay out a finished quest.
///
/// # Errors
///
/// [`CoreError::QuestNotFound`], [`CoreError::QuestClaimed`] or
/// [`CoreError::QuestIncomplete`].
pub fn claim(
    quests: &mut [Quest],
    wallet: &mut u64,
    stock: &mut Inventory,
    id: &QuestId,
) -> Result<Reward, CoreError> {
    let quest = quests
        .iter_mut()
        .find(|q| &q.id == id)
        .ok_or_else(|| CoreError::QuestNotFound(id.clone()))?;
    if quest.claimed {
        return Err(CoreError::QuestClaimed(id.clone()));
    }
    if !quest.is_complete() {
        return Err(CoreError::QuestIncomplete(id.clone()));
    }
    match quest.reward {
        Reward::Nugs(n) => *wallet = wallet.saturating_add(n),
        Reward::Buds(n) => inventory::add_legacy(stock, n),
    }
    quest.claimed = true;
    info!(quest = %id, reward = ?quest.reward, "quest claimed");
    Ok(quest.reward)
}
