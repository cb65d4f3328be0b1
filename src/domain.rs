// src/domain.rs

pub mod ledger;
pub mod lifecycle;
pub mod transition;
pub mod views;
