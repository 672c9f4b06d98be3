//! The fixed question sets of the basic and advanced risk assessments.

use std::sync::LazyLock;

use crate::domain::models::{
    AssessmentKind, FindingTemplate, Question, QuestionKind, QuestionSet, Severity,
};

/// Points a "yes" earns on a basic question. Every basic question is worth
/// the same, so the basic score is the share of "yes" answers.
pub const BASIC_POINTS: u32 = 10;

/// Options of the framework alignment question.
pub const FRAMEWORK_OPTIONS: [&str; 4] = ["NIST CSF", "ISO 27001", "SOC 2", "CIS Controls"];

static BASIC: LazyLock<QuestionSet> = LazyLock::new(build_basic);
static ADVANCED: LazyLock<QuestionSet> = LazyLock::new(build_advanced);

/// Question set for an assessment kind.
pub fn question_set(kind: AssessmentKind) -> &'static QuestionSet {
    match kind {
        AssessmentKind::Basic => &BASIC,
        AssessmentKind::Advanced => &ADVANCED,
    }
}

fn yes_no(
    id: &str,
    prompt: &str,
    title: &str,
    description: &str,
    severity: Severity,
    category: &str,
    recommendation: &str,
) -> Question {
    Question::new(
        id,
        prompt,
        QuestionKind::yes_no(BASIC_POINTS),
        FindingTemplate::new(title, description, severity, category, recommendation),
    )
}

fn build_basic() -> QuestionSet {
    QuestionSet::new(
        AssessmentKind::Basic,
        vec![
            yes_no(
                "mfa_enabled",
                "Is multi-factor authentication enforced for all user accounts?",
                "Multi-factor authentication not enforced",
                "User accounts can authenticate with a password alone, leaving them exposed to credential theft.",
                Severity::High,
                "Access Control",
                "Enforce multi-factor authentication for all interactive and remote access.",
            ),
            yes_no(
                "data_backups",
                "Are critical data backups performed and restore-tested regularly?",
                "Backups not performed or tested",
                "Critical data may be unrecoverable after ransomware, hardware failure or operator error.",
                Severity::High,
                "Contingency Planning",
                "Schedule automated backups of critical data and test restores at least quarterly.",
            ),
            yes_no(
                "security_training",
                "Do all employees complete security awareness training at least annually?",
                "Security awareness training missing",
                "Staff are not regularly trained to recognize phishing and social engineering.",
                Severity::Medium,
                "Awareness and Training",
                "Run annual security awareness training with periodic phishing simulations.",
            ),
            yes_no(
                "incident_response_plan",
                "Is there a documented and tested incident response plan?",
                "No incident response plan",
                "Without a documented plan, incident handling is ad hoc and containment is delayed.",
                Severity::High,
                "Incident Response",
                "Document an incident response plan with roles and contacts, and exercise it annually.",
            ),
            yes_no(
                "patch_management",
                "Are operating systems and applications patched within 30 days of release?",
                "Patching is not timely",
                "Known vulnerabilities remain exploitable for extended periods.",
                Severity::Critical,
                "System and Information Integrity",
                "Adopt a patch management process with a 30-day window, 7 days for critical fixes.",
            ),
            yes_no(
                "access_reviews",
                "Are user access rights reviewed at least quarterly?",
                "Access rights are not reviewed",
                "Stale and excessive privileges accumulate when access is never recertified.",
                Severity::Medium,
                "Access Control",
                "Review user and privileged access quarterly and remove unneeded rights.",
            ),
            yes_no(
                "encryption_at_rest",
                "Is sensitive data encrypted at rest?",
                "Sensitive data not encrypted at rest",
                "Lost or stolen media and storage snapshots expose sensitive data in clear text.",
                Severity::High,
                "System and Communications Protection",
                "Encrypt databases, file shares, laptops and backups holding sensitive data.",
            ),
            yes_no(
                "endpoint_protection",
                "Is endpoint protection deployed on all workstations and servers?",
                "Endpoint protection gaps",
                "Hosts without endpoint protection can be compromised by commodity malware unnoticed.",
                Severity::Medium,
                "System and Information Integrity",
                "Deploy and centrally monitor endpoint protection on every workstation and server.",
            ),
        ],
    )
}

fn build_advanced() -> QuestionSet {
    QuestionSet::new(
        AssessmentKind::Advanced,
        vec![
            Question::new(
                "risk_assessment_process",
                "Does the organization have a formal risk assessment process?",
                QuestionKind::radio(&["Yes", "In Progress", "No"], &["No", "In Progress"]),
                FindingTemplate::new(
                    "Formal risk assessment process missing",
                    "Risks are not identified and evaluated through a repeatable process.",
                    Severity::High,
                    "Risk Assessment",
                    "Establish a documented risk assessment methodology and perform it at least annually.",
                ),
            ),
            Question::new(
                "vendor_risk_management",
                "Are third-party vendors assessed for security risk before onboarding?",
                QuestionKind::radio(&["Always", "Sometimes", "Never"], &["Sometimes", "Never"]),
                FindingTemplate::new(
                    "Vendor risk not consistently assessed",
                    "Third parties gain access to systems and data without a security review.",
                    Severity::Medium,
                    "Supply Chain Risk Management",
                    "Require a security questionnaire and contract clauses for every new vendor.",
                ),
            ),
            Question::new(
                "continuous_monitoring",
                "Are security controls continuously monitored?",
                QuestionKind::radio(&["Yes", "Partially", "No"], &["Partially", "No"]),
                FindingTemplate::new(
                    "Continuous monitoring not in place",
                    "Control failures and intrusions may go unnoticed between periodic reviews.",
                    Severity::High,
                    "Assessment, Authorization, and Monitoring",
                    "Centralize security logs and alerting and define a continuous monitoring strategy.",
                ),
            ),
            Question::new(
                "security_governance",
                "Describe the governance structure of your security program.",
                QuestionKind::text(),
                FindingTemplate::new(
                    "Security governance insufficiently defined",
                    "Roles, responsibilities and oversight of the security program are unclear.",
                    Severity::Medium,
                    "Program Management",
                    "Document security roles, a steering body and reporting lines to leadership.",
                ),
            ),
            Question::new(
                "incident_lessons_learned",
                "Describe how your most recent security incident was handled and what was learned.",
                QuestionKind::text(),
                FindingTemplate::new(
                    "Incident lessons learned not captured",
                    "Incidents are closed without a review that feeds improvements back into controls.",
                    Severity::Medium,
                    "Incident Response",
                    "Hold a post-incident review for every significant incident and track the actions.",
                ),
            ),
            Question::new(
                "security_maturity",
                "Rate the overall maturity of your security program (0-10).",
                QuestionKind::slider("Current maturity"),
                FindingTemplate::new(
                    "Low security program maturity",
                    "The security program is self-assessed below the target maturity level.",
                    Severity::Medium,
                    "Program Management",
                    "Build a maturity roadmap against a recognized framework and reassess yearly.",
                ),
            ),
            Question::new(
                "logging_coverage",
                "Rate how completely security-relevant events are logged across systems (0-10).",
                QuestionKind::slider("Current coverage"),
                FindingTemplate::new(
                    "Insufficient security logging coverage",
                    "Security events on some systems are not logged or retained.",
                    Severity::High,
                    "Audit and Accountability",
                    "Forward authentication, privilege and system events from all systems to central logging.",
                ),
            ),
            Question::new(
                "framework_alignment",
                "Which security frameworks does the organization align with?",
                QuestionKind::multi_select(&FRAMEWORK_OPTIONS),
                FindingTemplate::new(
                    "Limited framework alignment",
                    "The security program is mapped to fewer than two recognized frameworks.",
                    Severity::Low,
                    "Program Management",
                    "Map controls to at least two frameworks, such as NIST CSF and CIS Controls.",
                ),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_basic_set_is_eight_yes_no_questions() {
        let set = question_set(AssessmentKind::Basic);
        assert_eq!(set.len(), 8);
        assert!(set
            .questions
            .iter()
            .all(|q| q.kind == QuestionKind::yes_no(BASIC_POINTS)));
    }

    #[test]
    fn test_advanced_set_mixes_kinds() {
        let set = question_set(AssessmentKind::Advanced);
        let count = |name: &str| {
            set.questions
                .iter()
                .filter(|q| q.kind.type_name() == name)
                .count()
        };
        assert_eq!(count("radio"), 3);
        assert_eq!(count("text"), 2);
        assert_eq!(count("slider"), 2);
        assert_eq!(count("multi_select"), 1);
    }

    #[test]
    fn test_question_ids_are_unique() {
        for kind in AssessmentKind::ALL {
            let set = question_set(*kind);
            let ids: HashSet<_> = set.questions.iter().map(|q| q.id.as_str()).collect();
            assert_eq!(ids.len(), set.len());
            assert_eq!(set.kind, *kind);
        }
    }

    #[test]
    fn test_radio_negative_values_are_options() {
        for question in &question_set(AssessmentKind::Advanced).questions {
            if let QuestionKind::Radio { options, negative } = &question.kind {
                assert!(negative.iter().all(|n| options.contains(n)), "{}", question.id);
            }
        }
    }
}
