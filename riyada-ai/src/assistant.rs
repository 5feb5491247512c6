//! The assistant: one in-flight request at a time, results applied to the
//! learner's state only after they decode cleanly.

use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use riyada_core::{ExamSession, PlanWorkbook};

use crate::client::{CompletionRequest, CompletionService};
use crate::error::AiError;
use crate::gate::InFlightGate;
use crate::parse::parse_payload;
use crate::tasks::Payload;
use crate::tasks::analysis::{
    BmcAnalysis, BmcCanvas, CompetitorAnalysis, CompetitorProfile, PestleAnalysis, PestleInput,
    SwotAnalysis, SwotInput, bmc_request, competitor_request, pestle_request, swot_request,
};
use crate::tasks::asset_rate::{AssetRateSuggestion, lookup_request};
use crate::tasks::exam::{exam_request, parse_questions};
use crate::tasks::identity::{
    IdentityBrief, IdentityDraft, IdentityReview, IdentityStatement, generate_request,
    review_request,
};
use crate::tasks::plans::{
    PlanPrompt, ProjectIdea, Refinement, draft_request, parse_draft, refine_request,
};

pub struct Assistant<S> {
    service: S,
    gate: InFlightGate,
}

impl<S: CompletionService> Assistant<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            gate: InFlightGate::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// True while a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Generates a full plan and merges it into `workbook`.
    ///
    /// Returns the number of sections written. Nothing is changed on failure.
    pub async fn draft_plan<K: PlanPrompt>(
        &self,
        idea: &ProjectIdea,
        workbook: &mut PlanWorkbook<K>,
    ) -> Result<usize, AiError> {
        let request = draft_request::<K>(idea)?;
        let raw = self.send(K::PLAN_NAME, request).await?;
        let sections = parse_draft::<K>(&raw)?;
        Ok(workbook.merge_draft(sections))
    }

    /// Requests a rewrite of one section and stores it as a pending suggestion.
    pub async fn refine_section<K: PlanPrompt>(
        &self,
        workbook: &mut PlanWorkbook<K>,
        section: K,
    ) -> Result<(), AiError> {
        let request = refine_request(workbook, section)?;
        let refinement: Refinement = self.run("refine section", request).await?;
        workbook.set_suggestion(section, refinement.into_suggestion()?);
        Ok(())
    }

    pub async fn analyze_bmc(
        &self,
        canvas: &BmcCanvas,
    ) -> Result<BmcAnalysis, AiError> {
        self.run("bmc analysis", bmc_request(canvas)?).await
    }

    pub async fn analyze_swot(
        &self,
        input: &SwotInput,
    ) -> Result<SwotAnalysis, AiError> {
        self.run("swot analysis", swot_request(input)?).await
    }

    pub async fn analyze_pestle(
        &self,
        input: &PestleInput,
    ) -> Result<PestleAnalysis, AiError> {
        self.run("pestle analysis", pestle_request(input)?).await
    }

    pub async fn compare_competitor(
        &self,
        mine: &CompetitorProfile,
        theirs: &CompetitorProfile,
    ) -> Result<CompetitorAnalysis, AiError> {
        self.run("competitor analysis", competitor_request(mine, theirs)?)
            .await
    }

    /// Generates vision, mission and values and merges the parts that came back.
    pub async fn generate_identity(
        &self,
        brief: &IdentityBrief,
        statement: &mut IdentityStatement,
    ) -> Result<(), AiError> {
        let draft: IdentityDraft = self.run("identity", generate_request(brief)?).await?;
        draft.merge_into(statement);
        Ok(())
    }

    pub async fn review_identity(
        &self,
        statement: &IdentityStatement,
    ) -> Result<IdentityReview, AiError> {
        self.run("identity review", review_request(statement)?).await
    }

    pub async fn lookup_asset_rate(
        &self,
        search_term: &str,
    ) -> Result<AssetRateSuggestion, AiError> {
        self.run("asset rate", lookup_request(search_term)?).await
    }

    /// Generates a practice exam and starts `session` with it.
    ///
    /// The session shows as generating while the request runs and falls
    /// back to idle if anything fails. Returns the number of questions.
    pub async fn generate_exam(
        &self,
        session: &mut ExamSession,
    ) -> Result<usize, AiError> {
        session.begin_generation()?;
        let result = match self.send("exam", exam_request()).await {
            Ok(raw) => parse_questions(&raw),
            Err(e) => Err(e),
        };
        match result {
            Ok(questions) => {
                let count = questions.len();
                session.start(questions)?;
                Ok(count)
            }
            Err(e) => {
                session.generation_failed();
                Err(e)
            }
        }
    }

    async fn send(
        &self,
        task: &'static str,
        request: CompletionRequest,
    ) -> Result<String, AiError> {
        let _guard = self.gate.try_acquire().inspect_err(|_| {
            warn!(task, "request rejected, another one is in flight");
        })?;
        debug!(task, "sending completion request");
        self.service.complete(&request).await.inspect_err(|e| {
            error!(task, error = %e, "completion request failed");
        })
    }

    async fn run<T: DeserializeOwned + Payload>(
        &self,
        task: &'static str,
        request: CompletionRequest,
    ) -> Result<T, AiError> {
        let raw = self.send(task, request).await?;
        let payload: T = parse_payload(&raw)?;
        if payload.is_empty() {
            warn!(task, "completion payload carried no usable content");
            return Err(AiError::EmptyResponse);
        }
        Ok(payload)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tests
// ─────────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tokio::sync::Notify;

    use riyada_core::{BusinessPlanSection, ExamStatus, Suggestion};

    use super::*;

    // ── stub services ────────────────────────────────────────────────────

    struct CannedService {
        reply: Result<&'static str, u16>,
        called: AtomicBool,
    }

    impl CannedService {
        fn ok(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                called: AtomicBool::new(false),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                called: AtomicBool::new(false),
            }
        }

        fn was_called(&self) -> bool {
            self.called.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionService for CannedService {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<String, AiError> {
            self.called.store(true, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(AiError::Api {
                    status,
                    body: "quota exceeded".to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct BlockingService {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl CompletionService for BlockingService {
        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<String, AiError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(r#"{"suggestedRate":"20"}"#.to_string())
        }
    }

    fn idea() -> ProjectIdea {
        ProjectIdea {
            name: "Green Bakery".to_string(),
            description: "Organic bread for the neighbourhood.".to_string(),
        }
    }

    // ── plans ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn draft_plan_merges_generated_sections() {
        let assistant = Assistant::new(CannedService::ok(
            r#"{"executive_summary":"A bakery.","team":"Two bakers."}"#,
        ));
        let mut plan = PlanWorkbook::<BusinessPlanSection>::new();
        plan.set_text(BusinessPlanSection::Financial, "Keep me");

        let applied = assistant.draft_plan(&idea(), &mut plan).await.unwrap();

        assert_eq!(applied, 2);
        assert_eq!(plan.text(BusinessPlanSection::ExecutiveSummary), "A bakery.");
        assert_eq!(plan.text(BusinessPlanSection::Financial), "Keep me");
    }

    #[tokio::test]
    async fn draft_plan_failure_leaves_workbook_untouched() {
        let assistant = Assistant::new(CannedService::ok("not json at all"));
        let mut plan = PlanWorkbook::<BusinessPlanSection>::new();
        plan.set_text(BusinessPlanSection::Team, "Original team");

        let result = assistant.draft_plan(&idea(), &mut plan).await;

        assert!(matches!(result, Err(AiError::Malformed(_))));
        assert_eq!(plan.text(BusinessPlanSection::Team), "Original team");
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn refine_section_stores_suggestion() {
        let assistant = Assistant::new(CannedService::ok(
            r#"{"refined":"A stronger team section.","advice":"Mention experience."}"#,
        ));
        let mut plan = PlanWorkbook::<BusinessPlanSection>::new();
        plan.set_text(BusinessPlanSection::Team, "We are two friends who bake.");

        assistant
            .refine_section(&mut plan, BusinessPlanSection::Team)
            .await
            .unwrap();

        assert_eq!(
            plan.suggestion(BusinessPlanSection::Team),
            Some(&Suggestion {
                refined: "A stronger team section.".to_string(),
                advice: "Mention experience.".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn short_draft_is_rejected_before_calling_service() {
        let assistant = Assistant::new(CannedService::ok("{}"));
        let mut plan = PlanWorkbook::<BusinessPlanSection>::new();
        plan.set_text(BusinessPlanSection::Team, "tiny");

        let result = assistant
            .refine_section(&mut plan, BusinessPlanSection::Team)
            .await;

        assert!(matches!(result, Err(AiError::Plan(_))));
        assert!(!assistant.service().was_called());
    }

    // ── analyses / lookups ───────────────────────────────────────────────

    #[tokio::test]
    async fn empty_payload_is_reported() {
        let assistant = Assistant::new(CannedService::ok(r#"{"advantage":"","positioning":null}"#));

        let result = assistant
            .compare_competitor(
                &CompetitorProfile::named("Me"),
                &CompetitorProfile::named("Them"),
            )
            .await;

        assert!(matches!(result, Err(AiError::EmptyResponse)));
    }

    #[tokio::test]
    async fn service_error_propagates() {
        let assistant = Assistant::new(CannedService::failing(429));

        let result = assistant.lookup_asset_rate("Oven").await;

        assert!(matches!(result, Err(AiError::Api { status: 429, .. })));
        assert!(assistant.service().was_called());
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn lookup_asset_rate_returns_suggestion() {
        let assistant = Assistant::new(CannedService::ok(
            "```json\n{\"assetName\":\"Oven\",\"estimatedLife\":\"8-10 years\",\"suggestedRate\":\"12.5%\"}\n```",
        ));

        let suggestion = assistant.lookup_asset_rate("oven").await.unwrap();

        assert_eq!(suggestion.rate(), Some(dec!(12.5)));
        assert_eq!(suggestion.to_asset_input("oven").name, "Oven");
    }

    #[tokio::test]
    async fn generate_identity_merges_into_statement() {
        let assistant = Assistant::new(CannedService::ok(
            r#"{"vision":"Lead the region","mission":"Bake daily"}"#,
        ));
        let brief = IdentityBrief {
            project_name: "Green Bakery".to_string(),
            field: "Food".to_string(),
        };
        let mut statement = IdentityStatement {
            values: "Honesty".to_string(),
            ..IdentityStatement::default()
        };

        assistant
            .generate_identity(&brief, &mut statement)
            .await
            .unwrap();

        assert_eq!(statement.vision, "Lead the region");
        assert_eq!(statement.mission, "Bake daily");
        assert_eq!(statement.values, "Honesty");
    }

    // ── exam ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn generate_exam_starts_session() {
        let assistant = Assistant::new(CannedService::ok(
            r#"[{"id":1,"text":"Is cash an asset?","type":"tf","options":["True","False"],"correctAnswer":"True"}]"#,
        ));
        let mut session = ExamSession::new();

        let count = assistant.generate_exam(&mut session).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(session.status(), ExamStatus::Active);
    }

    #[tokio::test]
    async fn generate_exam_failure_returns_to_idle() {
        let assistant = Assistant::new(CannedService::failing(500));
        let mut session = ExamSession::new();

        let result = assistant.generate_exam(&mut session).await;

        assert!(result.is_err());
        assert_eq!(session.status(), ExamStatus::Idle);
    }

    // ── in-flight gate ───────────────────────────────────────────────────

    #[tokio::test]
    async fn second_request_while_busy_is_rejected() {
        let assistant = Assistant::new(BlockingService::default());

        let first = assistant.lookup_asset_rate("Oven");
        let second = async {
            assistant.service().entered.notified().await;
            assert!(assistant.is_busy());
            let result = assistant.lookup_asset_rate("Van").await;
            assistant.service().release.notify_one();
            result
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap().rate(), Some(dec!(20)));
        assert!(matches!(second, Err(AiError::Busy)));
        assert!(!assistant.is_busy());
    }
}
