mod repository;

pub use repository::TransactionRepository;
pub(crate) use repository::insert_transaction_in;
