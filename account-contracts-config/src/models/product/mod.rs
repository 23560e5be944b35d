pub mod casa_parameters;
pub mod internal_accounts;
pub mod schedule_time;
pub mod time_deposit_parameters;
pub mod transaction_type;
pub mod validation;

pub use casa_parameters::{
    AccountFeesModel, AutosaveFeature, CasaParameters, DepositInterestFeature, ExcessWithdrawalFeature,
    OverdraftFeature, TransactionLimitsModel, UnarrangedOverdraftFeeFeature,
};
pub use internal_accounts::{FeeAccountsModel, InterestAccountsModel};
pub use schedule_time::ScheduleTime;
pub use time_deposit_parameters::{TermUnit, TimeDepositParameters};
pub use transaction_type::TransactionCodeMapping;
