use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use account_contracts_api::{ContractResult, Vault};

use crate::models::calendar::{DayCountConvention, Frequency};
use crate::models::interest_rate_tier::BalanceTierRanges;
use crate::models::product::internal_accounts::{FeeAccountsModel, InterestAccountsModel};
use crate::models::product::schedule_time::ScheduleTime;
use crate::models::product::transaction_type::TransactionCodeMapping;
use crate::models::product::validation::{validate_non_negative, validate_positive};
use crate::models::tier::{TierName, TieredParameter};
use crate::repository::{validated, LoadParameters, OptionalFeature, ParameterReader};

pub mod names {
    pub const DENOMINATION: &str = "denomination";
    pub const ADDITIONAL_DENOMINATIONS: &str = "additional_denominations";
    pub const ACCOUNT_TIER_NAMES: &str = "account_tier_names";
    pub const INTEREST_ACCRUAL_DAYS_IN_YEAR: &str = "interest_accrual_days_in_year";
    pub const ACCRUAL_PRECISION: &str = "accrual_precision";
    pub const FULFILLMENT_PRECISION: &str = "fulfillment_precision";
    pub const INTEREST_ACCRUAL: &str = "interest_accrual";
    pub const INTEREST_APPLICATION: &str = "interest_application";
    pub const INTEREST_APPLICATION_DAY: &str = "interest_application_day";
    pub const FEES_APPLICATION: &str = "fees_application";
    pub const FEES_APPLICATION_DAY: &str = "fees_application_day";

    pub const DEPOSIT_TIER_RANGES: &str = "deposit_tier_ranges";
    pub const DEPOSIT_INTEREST_RATE_TIERS: &str = "deposit_interest_rate_tiers";
    pub const DEPOSIT_INTEREST_APPLICATION_FREQUENCY: &str = "deposit_interest_application_frequency";

    pub const ARRANGED_OVERDRAFT_LIMIT: &str = "arranged_overdraft_limit";
    pub const UNARRANGED_OVERDRAFT_LIMIT: &str = "unarranged_overdraft_limit";
    pub const OVERDRAFT_INTEREST_RATE: &str = "overdraft_interest_rate";
    pub const INTEREST_FREE_BUFFER: &str = "interest_free_buffer";
    pub const OVERDRAFT_INTEREST_FREE_BUFFER_DAYS: &str = "overdraft_interest_free_buffer_days";
    pub const UNARRANGED_OVERDRAFT_FEE: &str = "unarranged_overdraft_fee";
    pub const UNARRANGED_OVERDRAFT_FEE_CAP: &str = "unarranged_overdraft_fee_cap";

    pub const MINIMUM_DEPOSIT: &str = "minimum_deposit";
    pub const MINIMUM_WITHDRAWAL: &str = "minimum_withdrawal";
    pub const MAXIMUM_BALANCE: &str = "maximum_balance";
    pub const MAXIMUM_DAILY_DEPOSIT: &str = "maximum_daily_deposit";
    pub const MAXIMUM_DAILY_WITHDRAWAL: &str = "maximum_daily_withdrawal";
    pub const MAXIMUM_DAILY_ATM_WITHDRAWAL_LIMIT: &str = "maximum_daily_atm_withdrawal_limit";
    pub const TRANSACTION_CODE_TO_TYPE_MAP: &str = "transaction_code_to_type_map";

    pub const MONTHLY_WITHDRAWAL_LIMIT: &str = "monthly_withdrawal_limit";
    pub const REJECT_EXCESS_WITHDRAWALS: &str = "reject_excess_withdrawals";
    pub const EXCESS_WITHDRAWAL_FEE: &str = "excess_withdrawal_fee";

    pub const AUTOSAVE_ROUNDING_AMOUNT: &str = "autosave_rounding_amount";
    pub const AUTOSAVE_SAVINGS_ACCOUNT: &str = "autosave_savings_account";

    pub const MAINTENANCE_FEE_MONTHLY: &str = "maintenance_fee_monthly";
    pub const MAINTENANCE_FEE_ANNUAL: &str = "maintenance_fee_annual";
    pub const ACCOUNT_INACTIVITY_FEE: &str = "account_inactivity_fee";
    pub const MINIMUM_BALANCE_FEE: &str = "minimum_balance_fee";
    pub const MINIMUM_BALANCE_THRESHOLD: &str = "minimum_balance_threshold";
}

pub const DEFAULT_ACCRUAL_PRECISION: u32 = 5;
pub const DEFAULT_FULFILLMENT_PRECISION: u32 = 2;
pub const DEFAULT_ACCRUAL_TIME: ScheduleTime = ScheduleTime::new(0, 0, 0);
pub const DEFAULT_APPLICATION_TIME: ScheduleTime = ScheduleTime::new(0, 1, 0);

/// Tiered deposit interest, enabled when both the ranges and the rates are set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DepositInterestFeature {
    pub deposit_tier_ranges: BalanceTierRanges,
    pub deposit_interest_rate_tiers: TieredParameter<Decimal>,
    pub deposit_interest_application_frequency: Frequency,
}

impl OptionalFeature for DepositInterestFeature {
    const PARAMETERS: &'static [&'static str] = &[names::DEPOSIT_TIER_RANGES, names::DEPOSIT_INTEREST_RATE_TIERS];

    fn read(reader: &ParameterReader<'_>) -> ContractResult<Self> {
        Ok(Self {
            deposit_tier_ranges: reader.json(names::DEPOSIT_TIER_RANGES)?,
            deposit_interest_rate_tiers: reader.json(names::DEPOSIT_INTEREST_RATE_TIERS)?,
            deposit_interest_application_frequency: reader
                .parse_or(names::DEPOSIT_INTEREST_APPLICATION_FREQUENCY, Frequency::Monthly)?,
        })
    }
}

/// Flat daily fee charged while below the arranged limit, capped per period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UnarrangedOverdraftFeeFeature {
    #[validate(custom(function = "validate_non_negative"))]
    pub unarranged_overdraft_fee: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub unarranged_overdraft_fee_cap: Decimal,
}

impl OptionalFeature for UnarrangedOverdraftFeeFeature {
    const PARAMETERS: &'static [&'static str] =
        &[names::UNARRANGED_OVERDRAFT_FEE, names::UNARRANGED_OVERDRAFT_FEE_CAP];

    fn read(reader: &ParameterReader<'_>) -> ContractResult<Self> {
        Ok(Self {
            unarranged_overdraft_fee: reader.decimal(names::UNARRANGED_OVERDRAFT_FEE)?,
            unarranged_overdraft_fee_cap: reader.decimal(names::UNARRANGED_OVERDRAFT_FEE_CAP)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_overdraft_limits"))]
pub struct OverdraftFeature {
    #[validate(custom(function = "validate_non_negative"))]
    pub arranged_overdraft_limit: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub unarranged_overdraft_limit: Decimal,
    pub overdraft_interest_rate: Decimal,
    /// Amount of overdraft free of interest, per account tier
    pub interest_free_buffer: Option<TieredParameter<Decimal>>,
    /// Days the buffer lasts, per account tier; `-1` never expires
    pub overdraft_interest_free_buffer_days: Option<TieredParameter<Decimal>>,
    #[validate(nested)]
    pub unarranged_fee: Option<UnarrangedOverdraftFeeFeature>,
}

fn validate_overdraft_limits(feature: &OverdraftFeature) -> Result<(), ValidationError> {
    if feature.arranged_overdraft_limit > feature.unarranged_overdraft_limit {
        return Err(ValidationError::new("arranged_limit_exceeds_unarranged_limit"));
    }
    Ok(())
}

impl OptionalFeature for OverdraftFeature {
    const PARAMETERS: &'static [&'static str] = &[
        names::ARRANGED_OVERDRAFT_LIMIT,
        names::UNARRANGED_OVERDRAFT_LIMIT,
        names::OVERDRAFT_INTEREST_RATE,
    ];

    fn read(reader: &ParameterReader<'_>) -> ContractResult<Self> {
        Ok(Self {
            arranged_overdraft_limit: reader.decimal(names::ARRANGED_OVERDRAFT_LIMIT)?,
            unarranged_overdraft_limit: reader.decimal(names::UNARRANGED_OVERDRAFT_LIMIT)?,
            overdraft_interest_rate: reader.decimal(names::OVERDRAFT_INTEREST_RATE)?,
            interest_free_buffer: reader.optional_json(names::INTEREST_FREE_BUFFER)?,
            overdraft_interest_free_buffer_days: reader.optional_json(names::OVERDRAFT_INTEREST_FREE_BUFFER_DAYS)?,
            unarranged_fee: UnarrangedOverdraftFeeFeature::read_if_configured(reader)?,
        })
    }
}

/// Round-up savings transfers on purchases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AutosaveFeature {
    #[validate(custom(function = "validate_positive"))]
    pub autosave_rounding_amount: Decimal,
    pub autosave_savings_account: heapless::String<50>,
}

impl OptionalFeature for AutosaveFeature {
    const PARAMETERS: &'static [&'static str] = &[names::AUTOSAVE_ROUNDING_AMOUNT, names::AUTOSAVE_SAVINGS_ACCOUNT];

    fn read(reader: &ParameterReader<'_>) -> ContractResult<Self> {
        Ok(Self {
            autosave_rounding_amount: reader.decimal(names::AUTOSAVE_ROUNDING_AMOUNT)?,
            autosave_savings_account: reader.account_code(names::AUTOSAVE_SAVINGS_ACCOUNT)?,
        })
    }
}

/// Monthly withdrawal count limit, either rejecting or charging the excess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ExcessWithdrawalFeature {
    pub monthly_withdrawal_limit: u32,
    pub reject_excess_withdrawals: bool,
    #[validate(custom(function = "validate_non_negative"))]
    pub excess_withdrawal_fee: Decimal,
}

impl OptionalFeature for ExcessWithdrawalFeature {
    const PARAMETERS: &'static [&'static str] = &[names::MONTHLY_WITHDRAWAL_LIMIT];

    fn read(reader: &ParameterReader<'_>) -> ContractResult<Self> {
        Ok(Self {
            monthly_withdrawal_limit: reader.u32(names::MONTHLY_WITHDRAWAL_LIMIT)?,
            reject_excess_withdrawals: reader.bool_or(names::REJECT_EXCESS_WITHDRAWALS, true)?,
            excess_withdrawal_fee: reader.decimal_or(names::EXCESS_WITHDRAWAL_FEE, Decimal::ZERO)?,
        })
    }
}

/// Single-transaction and daily limits; each is skipped when unset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TransactionLimitsModel {
    #[validate(custom(function = "validate_non_negative"))]
    pub minimum_deposit: Option<Decimal>,
    #[validate(custom(function = "validate_non_negative"))]
    pub minimum_withdrawal: Option<Decimal>,
    pub maximum_balance: Option<Decimal>,
    #[validate(custom(function = "validate_non_negative"))]
    pub maximum_daily_deposit: Option<Decimal>,
    #[validate(custom(function = "validate_non_negative"))]
    pub maximum_daily_withdrawal: Option<Decimal>,
    pub maximum_daily_atm_withdrawal_limit: Option<TieredParameter<Decimal>>,
}

impl TransactionLimitsModel {
    pub fn read(reader: &ParameterReader<'_>) -> ContractResult<Self> {
        Ok(Self {
            minimum_deposit: reader.optional_decimal(names::MINIMUM_DEPOSIT)?,
            minimum_withdrawal: reader.optional_decimal(names::MINIMUM_WITHDRAWAL)?,
            maximum_balance: reader.optional_decimal(names::MAXIMUM_BALANCE)?,
            maximum_daily_deposit: reader.optional_decimal(names::MAXIMUM_DAILY_DEPOSIT)?,
            maximum_daily_withdrawal: reader.optional_decimal(names::MAXIMUM_DAILY_WITHDRAWAL)?,
            maximum_daily_atm_withdrawal_limit: reader.optional_json(names::MAXIMUM_DAILY_ATM_WITHDRAWAL_LIMIT)?,
        })
    }
}

/// Periodic account fees; zero or unset fees are never charged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct AccountFeesModel {
    pub maintenance_fee_monthly: Option<TieredParameter<Decimal>>,
    #[validate(custom(function = "validate_non_negative"))]
    pub maintenance_fee_annual: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub account_inactivity_fee: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub minimum_balance_fee: Decimal,
    pub minimum_balance_threshold: Option<TieredParameter<Decimal>>,
}

impl AccountFeesModel {
    pub fn read(reader: &ParameterReader<'_>) -> ContractResult<Self> {
        Ok(Self {
            maintenance_fee_monthly: reader.optional_json(names::MAINTENANCE_FEE_MONTHLY)?,
            maintenance_fee_annual: reader.decimal_or(names::MAINTENANCE_FEE_ANNUAL, Decimal::ZERO)?,
            account_inactivity_fee: reader.decimal_or(names::ACCOUNT_INACTIVITY_FEE, Decimal::ZERO)?,
            minimum_balance_fee: reader.decimal_or(names::MINIMUM_BALANCE_FEE, Decimal::ZERO)?,
            minimum_balance_threshold: reader.optional_json(names::MINIMUM_BALANCE_THRESHOLD)?,
        })
    }
}

/// Full configuration of a current account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CasaParameters {
    pub denomination: String,
    pub additional_denominations: Vec<String>,
    #[validate(length(min = 1))]
    pub account_tier_names: Vec<TierName>,
    pub interest_accrual_days_in_year: DayCountConvention,
    #[validate(range(max = 28))]
    pub accrual_precision: u32,
    #[validate(range(max = 28))]
    pub fulfillment_precision: u32,
    #[validate(nested)]
    pub interest_accrual_time: ScheduleTime,
    #[validate(range(min = 1, max = 31))]
    pub interest_application_day: u32,
    #[validate(nested)]
    pub interest_application_time: ScheduleTime,
    #[validate(range(min = 1, max = 31))]
    pub fees_application_day: u32,
    #[validate(nested)]
    pub fees_application_time: ScheduleTime,
    #[validate(nested)]
    pub deposit_interest: Option<DepositInterestFeature>,
    #[validate(nested)]
    pub overdraft: Option<OverdraftFeature>,
    #[validate(nested)]
    pub autosave: Option<AutosaveFeature>,
    #[validate(nested)]
    pub excess_withdrawals: Option<ExcessWithdrawalFeature>,
    #[validate(nested)]
    pub limits: TransactionLimitsModel,
    #[validate(nested)]
    pub fees: AccountFeesModel,
    pub transaction_code_to_type_map: TransactionCodeMapping,
    pub interest_accounts: InterestAccountsModel,
    pub fee_accounts: FeeAccountsModel,
}

impl CasaParameters {
    /// Main denomination followed by the additional ones
    pub fn permitted_denominations(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.denomination.as_str()).chain(self.additional_denominations.iter().map(|d| d.as_str()))
    }

    pub fn is_permitted_denomination(&self, denomination: &str) -> bool {
        self.permitted_denominations().any(|d| d == denomination)
    }

    pub fn deposit_application_frequency(&self) -> Frequency {
        self.deposit_interest
            .as_ref()
            .map(|feature| feature.deposit_interest_application_frequency)
            .unwrap_or(Frequency::Monthly)
    }
}

impl LoadParameters for CasaParameters {
    fn load(vault: &dyn Vault, at: DateTime<Utc>) -> ContractResult<Self> {
        let reader = ParameterReader::new(vault, at);
        let parameters = CasaParameters {
            denomination: reader.text(names::DENOMINATION)?,
            additional_denominations: reader.optional_json(names::ADDITIONAL_DENOMINATIONS)?.unwrap_or_default(),
            account_tier_names: reader.json(names::ACCOUNT_TIER_NAMES)?,
            interest_accrual_days_in_year: reader
                .parse_or(names::INTEREST_ACCRUAL_DAYS_IN_YEAR, DayCountConvention::Actual)?,
            accrual_precision: reader.u32_or(names::ACCRUAL_PRECISION, DEFAULT_ACCRUAL_PRECISION)?,
            fulfillment_precision: reader.u32_or(names::FULFILLMENT_PRECISION, DEFAULT_FULFILLMENT_PRECISION)?,
            interest_accrual_time: ScheduleTime::read(&reader, names::INTEREST_ACCRUAL, DEFAULT_ACCRUAL_TIME)?,
            interest_application_day: reader.u32(names::INTEREST_APPLICATION_DAY)?,
            interest_application_time: ScheduleTime::read(
                &reader,
                names::INTEREST_APPLICATION,
                DEFAULT_APPLICATION_TIME,
            )?,
            fees_application_day: reader.u32_or(names::FEES_APPLICATION_DAY, 1)?,
            fees_application_time: ScheduleTime::read(&reader, names::FEES_APPLICATION, DEFAULT_APPLICATION_TIME)?,
            deposit_interest: DepositInterestFeature::read_if_configured(&reader)?,
            overdraft: OverdraftFeature::read_if_configured(&reader)?,
            autosave: AutosaveFeature::read_if_configured(&reader)?,
            excess_withdrawals: ExcessWithdrawalFeature::read_if_configured(&reader)?,
            limits: TransactionLimitsModel::read(&reader)?,
            fees: AccountFeesModel::read(&reader)?,
            transaction_code_to_type_map: reader
                .optional_json(names::TRANSACTION_CODE_TO_TYPE_MAP)?
                .unwrap_or_default(),
            interest_accounts: InterestAccountsModel::read(&reader)?,
            fee_accounts: FeeAccountsModel::read(&reader)?,
        };
        validated(parameters)
    }
}
