// Backend gateway: contract, HTTP and offline implementations, rate limiting
pub mod api;
pub mod http;
pub mod offline;
pub mod rate_limit;

// Re-export commonly used types
pub use api::{
    ApiError, ChartQuery, DateList, GapCriteria, GapDirection, GapInsights, InsightRow,
    MarketDataApi,
};
pub use http::HttpGateway;
pub use offline::OfflineGateway;
pub use rate_limit::ActionBudget;
