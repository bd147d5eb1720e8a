//! Database entities

pub mod farm;
pub mod harvest;
pub mod producer;

pub use farm::Entity as Farm;
pub use harvest::Entity as Harvest;
pub use producer::Entity as Producer;

pub mod prelude {
    pub use super::farm::Entity as Farm;
    pub use super::harvest::Entity as Harvest;
    pub use super::producer::Entity as Producer;
}
