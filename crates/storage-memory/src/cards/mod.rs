mod repository;

pub use repository::CardRepository;
pub(crate) use repository::charge_card_in;
