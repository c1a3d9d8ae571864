use crate::clock_gate::DAY_RANGE;
use crate::topic::Topic;

/// One of the four flags persisted per (topic, day) survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurveyField {
    Pending,
    Sent,
    Liked,
    DidEverything,
}

impl SurveyField {
    pub const ALL: [SurveyField; 4] = [
        SurveyField::Pending,
        SurveyField::Sent,
        SurveyField::Liked,
        SurveyField::DidEverything,
    ];

    fn name(&self) -> &'static str {
        match self {
            SurveyField::Pending => "pending",
            SurveyField::Sent => "sent",
            SurveyField::Liked => "liked",
            SurveyField::DidEverything => "did_everything",
        }
    }
}

/// Every key the core reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    SelectedTopic,
    TopicStartDate,
    CompletedDays(Topic),
    Survey {
        topic: Topic,
        day: u32,
        field: SurveyField,
    },
}

impl StoreKey {
    pub fn survey(topic: Topic, day: u32, field: SurveyField) -> Self {
        StoreKey::Survey { topic, day, field }
    }

    pub fn as_key(&self) -> String {
        match self {
            StoreKey::SelectedTopic => "selected_topic".to_string(),
            StoreKey::TopicStartDate => "topic_start_date".to_string(),
            StoreKey::CompletedDays(topic) => format!("completed_days.{}", topic.slug()),
            StoreKey::Survey { topic, day, field } => {
                format!("survey.{}.{day}.{}", topic.slug(), field.name())
            }
        }
    }

    /// All survey keys belonging to `topic`.
    pub fn all_survey_keys(topic: Topic) -> impl Iterator<Item = StoreKey> {
        DAY_RANGE.flat_map(move |day| {
            SurveyField::ALL
                .into_iter()
                .map(move |field| StoreKey::survey(topic, day, field))
        })
    }
}
