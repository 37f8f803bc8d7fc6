use serde::Serialize;

// ---------------------------------------------------------------------------
// QuestionId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    CurrentBehavior,
    ExpectedBehavior,
    ImpactScope,
    Urgency,
}

impl QuestionId {
    pub fn all() -> &'static [QuestionId] {
        &[
            QuestionId::CurrentBehavior,
            QuestionId::ExpectedBehavior,
            QuestionId::ImpactScope,
            QuestionId::Urgency,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionId::CurrentBehavior => "current_behavior",
            QuestionId::ExpectedBehavior => "expected_behavior",
            QuestionId::ImpactScope => "impact_scope",
            QuestionId::Urgency => "urgency",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|q| q.as_str() == s)
    }

    pub fn question(self) -> &'static ClarificationQuestion {
        &QUESTIONS[self as usize]
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ClarificationQuestion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClarificationQuestion {
    pub id: QuestionId,
    pub label: &'static str,
    #[serde(rename = "question")]
    pub prompt: &'static str,
    /// Shorter wording used in the message posted to the task thread.
    #[serde(skip)]
    pub followup: &'static str,
}

static QUESTIONS: [ClarificationQuestion; 4] = [
    ClarificationQuestion {
        id: QuestionId::CurrentBehavior,
        label: "現在の動作",
        prompt: "現在どのような問題が発生していますか？具体的な状況を教えてください。",
        followup: "現在どのような問題が発生していますか？",
    },
    ClarificationQuestion {
        id: QuestionId::ExpectedBehavior,
        label: "期待する動作",
        prompt: "どのように動作することを期待していますか？",
        followup: "どのように動作することを期待していますか？",
    },
    ClarificationQuestion {
        id: QuestionId::ImpactScope,
        label: "影響範囲",
        prompt: "この問題はどの程度のユーザーに影響していますか？",
        followup: "この問題の影響範囲を教えてください",
    },
    ClarificationQuestion {
        id: QuestionId::Urgency,
        label: "緊急度",
        prompt: "いつまでに対応が必要でしょうか？（高/中/低）",
        followup: "対応の優先度を教えてください（高/中/低）",
    },
];

/// The fixed follow-up questions, in the order they are asked. Independent
/// of the classified product.
pub fn questions() -> &'static [ClarificationQuestion] {
    &QUESTIONS
}

/// Message posted back to the requester once a request has been classified.
pub fn bot_prompt(product: &str) -> String {
    let items: Vec<String> = questions()
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. **{}**: {}", i + 1, q.label, q.followup))
        .collect();
    format!(
        "🤖 要望管理Bot\n\
         この要望を確認しました。内容を分析した結果、**製品: {product}** に関連する案件と判定いたします。\n\n\
         @担当者 この要望について詳細をお聞かせください。\n\n\
         📝 **確認事項**\n{}",
        items.join("\n")
    )
}

/// One-line acknowledgment returned alongside an API classification.
pub fn analysis_message(product: &str) -> String {
    format!(
        "🤖 要望管理Bot\nこの要望を確認しました。内容を分析した結果、**製品: {product}** に関連する案件と判定いたします。"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_four_questions_in_fixed_order() {
        let ids: Vec<&str> = questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "current_behavior",
                "expected_behavior",
                "impact_scope",
                "urgency"
            ]
        );
    }

    #[test]
    fn question_lookup_matches_table() {
        for id in QuestionId::all() {
            assert_eq!(id.question().id, *id);
        }
        assert_eq!(QuestionId::Urgency.question().label, "緊急度");
    }

    #[test]
    fn parse_known_and_unknown_ids() {
        assert_eq!(
            QuestionId::parse("impact_scope"),
            Some(QuestionId::ImpactScope)
        );
        assert_eq!(QuestionId::parse("severity"), None);
    }

    #[test]
    fn serializes_prompt_as_question() {
        let json = serde_json::to_value(questions()).unwrap();
        assert_eq!(json[0]["id"], "current_behavior");
        assert_eq!(json[0]["label"], "現在の動作");
        assert!(json[0]["question"].as_str().unwrap().contains("問題"));
    }

    #[test]
    fn bot_prompt_lists_every_question() {
        let msg = bot_prompt("dashboard");
        assert!(msg.contains("**製品: dashboard**"));
        for q in questions() {
            assert!(msg.contains(q.label));
        }
        assert!(msg.contains("4. **緊急度**"));
    }

    #[test]
    fn bot_prompt_uses_followup_wording() {
        let msg = bot_prompt("call-runner");
        assert!(msg.contains("3. **影響範囲**: この問題の影響範囲を教えてください\n"));
        assert!(msg.ends_with("4. **緊急度**: 対応の優先度を教えてください（高/中/低）"));
        assert!(!msg.contains(QuestionId::ImpactScope.question().prompt));
        let json = serde_json::to_value(questions()).unwrap();
        assert!(json[0].get("followup").is_none());
    }
}
