mod repository;

pub use repository::SubscriptionRepository;
