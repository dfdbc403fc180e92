//! Fixed instructions and response schema for the direct-to-model client
use serde_json::{json, Value};

use crate::state::data::AnalysisCategory;

/// Coaching instruction sent alongside the frame
pub fn instruction(category: AnalysisCategory) -> &'static str {
    match category {
        AnalysisCategory::Batting => {
            "Analyze the batting technique in this frame. Focus on stance, grip, backlift, \
             head position, and balance. Identify technical flaws and strengths. Provide \
             specific, actionable drills for improvement. Be encouraging but clear."
        }
        AnalysisCategory::Bowling => {
            "Analyze the bowling action in this frame. Focus on the run-up context (if visible), \
             bound, load-up, arm position at release, and follow-through posture. Identify \
             technical flaws and strengths. Provide specific, actionable drills for improvement. \
             Be encouraging but clear."
        }
    }
}

/// JSON schema the model's output must follow; mirrors `AnalysisResult`
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overallSummary": {
                "type": "STRING",
                "description": "A brief, overall summary of the cricket technique shown."
            },
            "keyObservations": {
                "type": "ARRAY",
                "description": "A list of specific technical observations.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "area": {
                            "type": "STRING",
                            "description": "The technical area being analyzed (e.g., Stance, Backlift, Head Position, Arm Action)."
                        },
                        "feedback": {
                            "type": "STRING",
                            "description": "Detailed feedback on this specific area."
                        },
                        "isPositive": {
                            "type": "BOOLEAN",
                            "description": "True if the feedback is a strength, false if it is an area for improvement."
                        }
                    },
                    "required": ["area", "feedback", "isPositive"]
                }
            },
            "improvementTips": {
                "type": "ARRAY",
                "description": "A list of actionable drills or tips for improvement.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {
                            "type": "STRING",
                            "description": "A short, descriptive title for the drill."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "A step-by-step description of how to perform the drill."
                        }
                    },
                    "required": ["title", "description"]
                }
            }
        },
        "required": ["overallSummary", "keyObservations", "improvementTips"]
    })
}
