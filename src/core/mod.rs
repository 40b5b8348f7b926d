//! Core module - the shared data model and ranking over it

mod ranking;
mod types;

pub(crate) use ranking::{RankedModel, Ranking, RankingFilter, premium_over, rank};
pub(crate) use types::{
    Column, ColumnVisibility, Configuration, DataType, ImageSize, InputCost, InputTokens, Model,
    ModelSize, PdfData, PricingResult, Provider, Tier, TokenResult,
};
