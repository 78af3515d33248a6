use std::sync::Arc;

use rocket::{serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::assistant::Assistant;
use crate::model::accounting::FinancialData;

pub fn routes() -> Vec<Route> {
    routes![analysis]
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialAnalysis {
    /// What the assistant was shown.
    summary: String,
    analysis: String,
}

#[post("/accounting/analysis", data = "<data>", format = "json")]
async fn analysis(
    data: Json<FinancialData>,
    assistant: &State<Arc<dyn Assistant>>,
) -> Json<FinancialAnalysis> {
    let summary = data.summary();
    let analysis = assistant.analyze_financial_health(&summary).await;
    Json(FinancialAnalysis { summary, analysis })
}
