//! Route modules, one router per resource group.

pub mod entities;
pub mod health;
pub mod validate;
