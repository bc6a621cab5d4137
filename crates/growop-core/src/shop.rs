//! Purchases: levelled upgrades, environment stabilizers, staff, and the
//! per-slot automation setup that puts staff to work.

use growop_genetics::find_strain;
use growop_types::{AutomationState, EmployeeId, EnvUpgradeId, Slot, UpgradeEffect, UpgradeId};
use tracing::info;

use crate::error::{CoreError, charge};
use crate::state::{Context, GameState};

/// Price growth per level already owned.
pub const UPGRADE_PRICE_GROWTH: f64 = 1.5;

/// Price of the next level of an upgrade: `floor(base × 1.5^level)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn upgrade_price(base_price: u64, level: u32) -> u64 {
    let exponent = i32::try_from(level).unwrap_or(i32::MAX);
    (base_price as f64 * UPGRADE_PRICE_GROWTH.powi(exponent)).floor() as u64
}

/// Buy the next level of an upgrade. Returns the new level.
pub fn buy_upgrade<R>(
    state: &mut GameState,
    ctx: &Context<'_, R>,
    id: &UpgradeId,
) -> Result<u32, CoreError> {
    let upgrade = ctx
        .catalog
        .upgrade(id)
        .ok_or_else(|| CoreError::UnknownUpgrade(id.clone()))?;
    let level = state.upgrade_level(id);
    if level >= upgrade.max_level {
        return Err(CoreError::MaxLevel {
            upgrade: id.clone(),
            max_level: upgrade.max_level,
        });
    }
    let price = upgrade_price(upgrade.base_price, level);
    charge(&mut state.nugs, price)?;

    let level = level.saturating_add(1);
    state.upgrades.insert(id.clone(), level);
    if matches!(upgrade.effect, UpgradeEffect::ExtraSlot) {
        state.slots.push(Slot::default());
    }
    info!(upgrade = %id, level, price, "upgrade bought");
    Ok(level)
}

/// Buy a one-time environment upgrade.
pub fn buy_env_upgrade<R>(
    state: &mut GameState,
    ctx: &Context<'_, R>,
    id: &EnvUpgradeId,
) -> Result<(), CoreError> {
    let upgrade = ctx
        .catalog
        .env_upgrade(id)
        .ok_or_else(|| CoreError::UnknownEnvUpgrade(id.clone()))?;
    if state.env_upgrades.contains(id) {
        return Err(CoreError::EnvUpgradeOwned(id.clone()));
    }
    charge(&mut state.nugs, upgrade.price)?;
    state.env_upgrades.insert(id.clone());
    info!(upgrade = %id, price = upgrade.price, "environment upgrade bought");
    Ok(())
}

/// Put an employee on the payroll.
pub fn hire_employee<R>(
    state: &mut GameState,
    ctx: &Context<'_, R>,
    id: &EmployeeId,
) -> Result<(), CoreError> {
    let employee = ctx
        .catalog
        .employee(id)
        .ok_or_else(|| CoreError::UnknownEmployee(id.clone()))?;
    if state.employees.contains(id) {
        return Err(CoreError::AlreadyHired(id.clone()));
    }
    charge(&mut state.nugs, employee.price)?;
    state.employees.insert(id.clone());
    info!(employee = %id, price = employee.price, "employee hired");
    Ok(())
}

/// Replace a slot's automation settings.
///
/// The employee must be hired and the replant strain discovered.
pub fn configure_automation<R>(
    state: &mut GameState,
    ctx: &Context<'_, R>,
    index: usize,
    automation: &AutomationState,
) -> Result<(), CoreError> {
    if index >= state.slots.len() {
        return Err(CoreError::SlotNotFound(index));
    }
    if let Some(employee) = automation
        .employee
        .as_ref()
        .filter(|e| !state.employees.contains(*e))
    {
        return Err(CoreError::EmployeeNotHired(employee.clone()));
    }
    if let Some(strain) = &automation.replant {
        if find_strain(ctx.catalog, &state.breeding, strain).is_none() {
            return Err(CoreError::UnknownStrain(strain.clone()));
        }
        if !state.breeding.discovered.contains(strain) {
            return Err(CoreError::NotDiscovered(strain.clone()));
        }
    }
    if let Some(slot) = state.slots.get_mut(index) {
        slot.automation = automation.clone();
    }
    info!(slot = index, enabled = automation.enabled, "automation configured");
    Ok(())
}
