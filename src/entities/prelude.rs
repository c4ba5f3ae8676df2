pub use super::sites::Entity as Sites;
