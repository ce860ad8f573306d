//! Prompt construction for every pipeline stage.
//!
//! Pure functions from structured inputs to the exact textual contract sent
//! to the reasoning provider. Two categories exist:
//!
//! - **Structured** prompts end with an explicit JSON schema the provider
//!   must fill in; their responses go through `ResponseContract`.
//! - **Narrative** prompts request plain conversational text (clarification,
//!   no-match explanations) and bypass the contract entirely.
//!
//! Timestamps are passed in rather than read from the clock, keeping the
//! functions deterministic and unit-testable.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use std::fmt::Write;

use super::matching::MatchPreferences;
use super::pricing::MarketContext;
use super::problem::Problem;
use super::worker::WorkerRecord;

/// A short description of an uploaded image, fed into the analysis prompt.
#[derive(Debug, Clone)]
pub struct ImageSummary {
    pub analysis: Option<String>,
}

/// Builds the problem-analysis prompt.
///
/// Embeds the current date/time for seasonal and time-of-day context, the
/// customer's description, their location, and any image summaries, followed
/// by the trade category table, urgency indicators, follow-up rules, and the
/// analysis JSON schema.
pub fn analysis_prompt(
    description: &str,
    images: &[ImageSummary],
    location: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let image_line = if images.is_empty() {
        "None".to_string()
    } else {
        format!("{} image(s)", images.len())
    };

    let image_detail = if images.is_empty() {
        String::new()
    } else {
        let summaries: Vec<&str> = images
            .iter()
            .map(|i| i.analysis.as_deref().unwrap_or("Image uploaded"))
            .collect();
        format!("\n- Image Analysis: {}", summaries.join(", "))
    };

    format!(
        r#"You are an expert trades analysis AI for TradeMatch, a platform connecting customers with skilled tradespeople. Your job is to analyze customer problems and determine the best trade professionals needed.

CONTEXT:
- Current Date/Time: {date} {time}
- Platform: TradeMatch (trades matching platform)
- Goal: Accurate problem analysis and trade identification

CUSTOMER REQUEST:
- Problem Description: "{description}"
- User Location: {location}
- Images Provided: {image_line}{image_detail}

ANALYSIS REQUIREMENTS:

1. TRADE IDENTIFICATION:
   - Primary trade needed (electrician, plumber, HVAC, carpenter, mechanic, etc.)
   - Secondary trades if multi-trade job
   - Confidence level for each trade (0.0-1.0)
   - Specific specialties within the trade

2. URGENCY ASSESSMENT:
   - emergency: Safety hazard, flooding, no power, etc.
   - soon: Needs attention within 24-48 hours
   - flexible: Can wait days/weeks
   - Consider safety, functionality, and customer language

3. PROBLEM DETAILS EXTRACTION:
   - Specific components involved (pipes, wires, appliances, etc.)
   - Damage assessment from description/images
   - Tools or materials likely needed
   - Complexity level (simple, moderate, complex)

4. CONFIDENCE ASSESSMENT:
   - Overall confidence in problem identification (0.0-1.0)
   - Only ask follow-ups for safety issues or very unclear problems

TRADE CATEGORIES:
- Electrician: Wiring, outlets, panels, lighting, electrical safety
- Plumber: Pipes, leaks, drains, water heaters, fixtures
- HVAC: Heating, cooling, ventilation, air conditioning
- Carpenter: Wood work, doors, windows, cabinets, framing
- Mechanic: Vehicle repair, engine work, automotive systems
- Handyman: General repairs, assembly, minor fixes
- Appliance Repair: Washers, dryers, refrigerators, ovens
- Locksmith: Locks, keys, security systems
- Painter: Interior/exterior painting, drywall
- Roofer: Roof repair, gutters, weatherproofing

URGENCY INDICATORS:
- Emergency: "sparking", "flooding", "gas leak", "no heat", "emergency", "urgent", "asap"
- Soon: "today", "tomorrow", "soon", "quickly", "not working"
- Flexible: "when convenient", "sometime", "planning", "upgrade"

RESPONSE FORMAT:
Provide your analysis in this exact JSON format:

{{
  "trades": [
    {{
      "trade": "[trade name]",
      "confidence": [0.0-1.0],
      "specialties": ["[specific skills needed]"],
      "reasoning": "[why this trade is needed]"
    }}
  ],
  "urgency": "[emergency/soon/flexible]",
  "urgencyReasoning": "[why this urgency level]",
  "problemDetails": {{
    "category": "[electrical/plumbing/mechanical/etc]",
    "complexity": "[simple/moderate/complex]",
    "location": "[where the problem is]",
    "symptoms": ["[list of symptoms]"],
    "possibleCauses": ["[likely causes]"],
    "materialEstimate": "[materials that might be needed]",
    "timeEstimate": "[estimated duration]"
  }},
  "missingInfo": ["[what additional info would help]"],
  "followUpQuestions": ["[specific questions ONLY for safety issues or very unclear problems]"],
  "needsMoreInfo": [true/false - ONLY true for safety issues or very low confidence],
  "safetyIssues": ["[any immediate safety concerns]"],
  "summary": "[brief summary for customer]",
  "confidence": [0.0-1.0]
}}

IMPORTANT FOLLOW-UP RULES:
- ASK follow-up questions for:
  1. Safety issues (gas leaks, electrical sparking, flooding)
  2. Unclear problems (low confidence)
  3. Insufficient details for accurate pricing (leak severity, accessibility, materials needed)
  4. Problems requiring diagnostic information (intermittent issues, multiple symptoms)
- DO NOT ask about:
  1. Location (inferred from user profile)
  2. Timing/scheduling (handled in worker selection)
- If you generate followUpQuestions, you MUST set needsMoreInfo to true
- For pricing accuracy, ask about: problem severity, accessibility, previous attempts, visible damage

Be thorough but practical in your analysis."#,
        date = now.format("%Y-%m-%d"),
        time = now.format("%H:%M"),
        description = description,
        location = location.unwrap_or("Not specified"),
        image_line = image_line,
        image_detail = image_detail,
    )
}

/// Builds the worker-matching prompt, enumerating every roster record
/// verbatim so the provider ranks only real workers.
pub fn matching_prompt(
    problem: &Problem,
    workers: &[WorkerRecord],
    location: Option<&str>,
    preferences: &MatchPreferences,
) -> String {
    let mut roster = String::new();
    for worker in workers {
        // Write into a String cannot fail.
        let _ = write!(
            roster,
            "\nWorker ID: {id}\nName: {name}\nTrade: {trade}\nSpecialties: {specialties}\nRating: {rating}/5.0 ({reviews} reviews)\nExperience: {experience} years\nDistance: {distance} miles\nHourly Rate: ${rate}\nAvailability: {availability}\nCertifications: {certifications}\nCompleted Jobs: {jobs}\n---",
            id = worker.id,
            name = worker.name,
            trade = worker.trade,
            specialties = worker.specialties.join(", "),
            rating = worker.rating,
            reviews = worker.review_count,
            experience = worker.experience,
            distance = worker.distance,
            rate = worker.hourly_rate,
            availability = worker.availability.join(", "),
            certifications = worker.certifications.join(", "),
            jobs = worker.completed_jobs,
        );
    }

    let problem_json =
        serde_json::to_string_pretty(problem).unwrap_or_else(|_| problem.raw_text.clone());

    format!(
        r#"You are an expert worker matching AI for TradeMatch. Your job is to find the best tradespeople for customer needs.

CUSTOMER PROBLEM:
{problem_json}

CUSTOMER LOCATION: {location}

AVAILABLE WORKERS:
{roster}

CUSTOMER PREFERENCES:
- Budget Range: {budget}
- Timeline: {timeline}
- Quality Priority: {quality}

MATCHING CRITERIA:
1. Trade Match: Does worker's trade match the problem?
2. Specialty Match: Do worker's specialties align with specific needs?
3. Experience Level: Is experience appropriate for complexity?
4. Availability: Can worker meet timeline requirements?
5. Location: Is worker within reasonable distance?
6. Certifications: Does worker have required licenses/certs?
7. Rating/Reviews: Quality and reliability indicators
8. Similar Work: Has worker done similar jobs before?

RESPONSE FORMAT:
Return the top 3-4 best matches in this JSON format:

{{
  "matches": [
    {{
      "workerId": "[worker ID]",
      "matchScore": [0.0-1.0],
      "reasoning": "[why this worker is a good match]",
      "strengths": ["key strengths for this job"],
      "concerns": ["any potential concerns"],
      "estimatedArrival": "[time estimate]",
      "recommendationLevel": "[excellent/good/fair]"
    }}
  ],
  "summary": "[overall matching summary]",
  "alternatives": "[suggestions if no perfect matches]"
}}

Only reference worker IDs from the AVAILABLE WORKERS list. Rank workers by overall suitability, considering all factors. Provide honest assessments."#,
        problem_json = problem_json,
        location = location.unwrap_or("Not specified"),
        roster = roster,
        budget = preferences.budget_range.as_deref().unwrap_or("Not specified"),
        timeline = preferences.timeline.as_deref().unwrap_or("Not specified"),
        quality = preferences.quality_priority.as_deref().unwrap_or("Balanced"),
    )
}

/// Builds the pricing prompt for one worker.
///
/// The percentage bands are advisory ranges communicated to the provider,
/// never arithmetic the core performs itself.
pub fn pricing_prompt(
    worker: &WorkerRecord,
    problem: &Problem,
    estimated_hours: f64,
    market: &MarketContext,
    now: DateTime<Utc>,
) -> String {
    let trades: Vec<String> = problem
        .trades
        .iter()
        .map(|t| format!("{} ({}% confidence)", t.trade, (t.confidence * 100.0).round()))
        .collect();
    let trades = if trades.is_empty() {
        "Unknown".to_string()
    } else {
        trades.join(", ")
    };

    format!(
        r#"You are an expert pricing analyst for TradeMatch, a trades matching platform. Your job is to determine fair, competitive pricing for skilled trade services.

CONTEXT:
- Current Date/Time: {date} {time}
- Platform: TradeMatch (connects customers with skilled tradespeople)
- Goal: Fair pricing that benefits both customers and workers

WORKER PROFILE:
- Name: {name}
- Trade: {trade}
- Specialties: {specialties}
- Experience: {experience} years
- Rating: {rating}/5.0 ({reviews} reviews)
- Base Hourly Rate: ${rate}/hour
- Distance from Customer: {distance} miles
- Certifications: {certifications}
- Completed Jobs: {jobs}
- Availability: {availability}

CUSTOMER REQUEST:
- Problem Description: "{description}"
- Urgency Level: {urgency:?}
- Identified Trade Needs: {trades}
- Estimated Duration: {hours} hours

MARKET CONDITIONS:
- Season: {season}
- Day of Week: {weekday}
- Time of Day: {time_of_day}
- Local Demand: {demand}
- Weather Impact: {weather}

PRICING GUIDELINES:
- Emergency jobs (flooding, electrical hazards): 25-50% premium
- Same-day/urgent requests: 15-25% premium
- Highly rated workers (4.5+): 10-20% premium
- Extensive experience (10+ years): 10-15% premium
- Specialized certifications: 5-15% premium
- Travel >10 miles: Add $20-40 travel fee
- Peak demand times: 10-20% premium
- Complex/risky jobs: 15-30% premium

RESPONSE FORMAT:
Provide your pricing analysis in this exact JSON format:

{{
  "total": [final price in dollars, integer],
  "reasoning": "[2-3 sentences explaining your pricing logic]",
  "breakdown": {{
    "baseRate": [worker hourly rate],
    "hours": [estimated hours],
    "subtotal": [base rate x hours],
    "adjustments": [
      {{
        "factor": "[adjustment reason]",
        "amount": [dollar amount, can be negative],
        "percentage": [percentage change],
        "rationale": "[why this adjustment]"
      }}
    ],
    "travelFee": [travel fee if applicable],
    "finalTotal": [total after all adjustments]
  }},
  "confidence": [0.0-1.0, how confident you are in this pricing],
  "alternatives": {{
    "budget": [lower price option],
    "premium": [higher price option]
  }}
}}

Think through the pricing step by step, considering all factors. Be fair to both customer and worker. Provide transparent reasoning for your decisions."#,
        date = now.format("%Y-%m-%d"),
        time = now.format("%H:%M"),
        name = worker.name,
        trade = worker.trade,
        specialties = worker.specialties.join(", "),
        experience = worker.experience,
        rating = worker.rating,
        reviews = worker.review_count,
        rate = worker.hourly_rate,
        distance = worker.distance,
        certifications = worker.certifications.join(", "),
        jobs = worker.completed_jobs,
        availability = worker.availability.join(", "),
        description = problem.raw_text,
        urgency = problem.urgency,
        trades = trades,
        hours = estimated_hours,
        season = season_for(now),
        weekday = weekday_name(now.weekday()),
        time_of_day = time_of_day_for(now),
        demand = market.local_demand.as_deref().unwrap_or("Normal"),
        weather = market.weather_impact.as_deref().unwrap_or("None"),
    )
}

/// Builds the vision prompt for an uploaded image.
pub fn vision_prompt(problem_context: &str) -> String {
    format!(
        r#"Analyze this image in the context of a trades/repair problem.

Problem Context: "{problem_context}"

Provide a detailed analysis in JSON format:
{{
  "analysis": "[detailed description of what you see]",
  "suggestedTrades": [
    {{
      "trade": "[trade name]",
      "confidence": [0.0-1.0],
      "reasoning": "[why this trade is needed]"
    }}
  ],
  "urgency": "[emergency/soon/flexible]",
  "urgencyReasoning": "[why this urgency level]",
  "materialEstimate": "[materials that might be needed]",
  "complexityLevel": "[simple/moderate/complex]",
  "timeEstimate": "[estimated hours/days]",
  "safetyIssues": ["[list any safety concerns]"],
  "followUpQuestions": ["[questions to ask customer for more details]"],
  "confidence": [0.0-1.0]
}}"#
    )
}

/// Narrative prompt: ask for clarification when a message is too vague to
/// analyze. Plain-text response expected; no contract applied.
pub fn clarification_prompt(user_message: &str) -> String {
    format!(
        r#"A customer sent this message about a home repair/maintenance issue: "{user_message}"

The message is too vague to properly identify the problem and match them with the right tradesperson. Generate a helpful response that:

1. Acknowledges their situation empathetically
2. Asks 2-3 specific clarifying questions to better understand:
   - What exactly is broken/not working
   - Where the problem is located
   - When it started or how urgent it is
   - Any visible symptoms or signs

Make the response conversational and helpful, not robotic. Focus on gathering the most important information to identify the right trade professional.

Respond in plain text format, not JSON."#
    )
}

/// Narrative prompt: explain why no workers matched and suggest next steps.
pub fn no_match_prompt(problem: &Problem) -> String {
    let primary = problem
        .primary_trade()
        .map(|t| t.trade.clone())
        .unwrap_or_else(|| "home repair".to_string());
    let trades: Vec<&str> = problem.trades.iter().map(|t| t.trade.as_str()).collect();
    let trades = if trades.is_empty() {
        "Unknown".to_string()
    } else {
        trades.join(", ")
    };
    let summary = if problem.summary.is_empty() {
        "Home repair issue"
    } else {
        &problem.summary
    };

    format!(
        r#"A customer has a {primary} problem but no suitable workers were found in their area.

Problem summary: {summary}
Identified trades needed: {trades}
Urgency: {urgency:?}

Generate a helpful response that:
1. Acknowledges the situation
2. Explains why no matches were found (could be location, availability, or need more specific details)
3. Suggests next steps (expanding search area, providing more details, or alternative solutions)
4. Maintains a helpful and solution-oriented tone

Respond in plain text format, not JSON."#,
        primary = primary,
        summary = summary,
        trades = trades,
        urgency = problem.urgency,
    )
}

/// Structured fallback when vision analysis itself failed: acknowledge the
/// image and ask what it shows.
pub fn image_fallback_prompt(problem_context: &str) -> String {
    let context = if problem_context.is_empty() {
        "No additional context provided"
    } else {
        problem_context
    };

    format!(
        r#"A customer uploaded an image for a home repair issue but the image analysis failed.

Problem context: "{context}"

Generate a response that:
1. Acknowledges the image was received
2. Explains that manual review is needed
3. Asks 2-3 specific questions about what the image shows to help with matching

Return response in JSON format:
{{
  "analysis": "[acknowledgment message]",
  "followUpQuestions": ["[question 1]", "[question 2]", "[question 3]"]
}}"#
    )
}

/// Season for a UTC timestamp, northern-hemisphere convention.
pub fn season_for(now: DateTime<Utc>) -> &'static str {
    match now.month() {
        3..=5 => "Spring",
        6..=8 => "Summer",
        9..=11 => "Fall",
        _ => "Winter",
    }
}

/// Coarse time-of-day bucket for a UTC timestamp.
pub fn time_of_day_for(now: DateTime<Utc>) -> &'static str {
    match now.hour() {
        6..=11 => "Morning",
        12..=16 => "Afternoon",
        17..=20 => "Evening",
        _ => "Night",
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::{TradeNeed, Urgency};
    use crate::domain::worker::WorkerId;
    use chrono::TimeZone;

    fn sample_worker() -> WorkerRecord {
        WorkerRecord {
            id: WorkerId::new("w2"),
            name: "Rick Williams".to_string(),
            trade: "Plumber".to_string(),
            specialties: vec!["Pipe Repair".to_string(), "Drain Cleaning".to_string()],
            rating: 4.7,
            review_count: 203,
            distance: 2.8,
            hourly_rate: 75.0,
            availability: vec!["today".to_string(), "tomorrow".to_string()],
            certifications: vec!["Licensed Plumber".to_string()],
            experience: 8,
            completed_jobs: 285,
        }
    }

    fn sample_problem() -> Problem {
        Problem {
            raw_text: "My kitchen sink is leaking".to_string(),
            trades: vec![TradeNeed {
                trade: "Plumber".to_string(),
                confidence: 0.9,
                specialties: vec!["Pipe Repair".to_string()],
                reasoning: "active leak under sink".to_string(),
            }],
            urgency: Urgency::Soon,
            urgency_reasoning: "ongoing water damage risk".to_string(),
            details: Default::default(),
            missing_info: vec![],
            follow_up_questions: vec![],
            needs_more_info: false,
            safety_issues: vec![],
            summary: "Kitchen sink leak".to_string(),
            confidence: 0.85,
        }
    }

    fn noon_in_july() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 14, 12, 30, 0).unwrap()
    }

    #[test]
    fn analysis_prompt_embeds_description_and_context() {
        let prompt = analysis_prompt(
            "My sink is leaking",
            &[],
            Some("San Francisco"),
            noon_in_july(),
        );

        assert!(prompt.contains("\"My sink is leaking\""));
        assert!(prompt.contains("User Location: San Francisco"));
        assert!(prompt.contains("Images Provided: None"));
        assert!(prompt.contains("2025-07-14"));
        assert!(prompt.contains("\"followUpQuestions\""));
    }

    #[test]
    fn analysis_prompt_lists_image_summaries() {
        let images = vec![
            ImageSummary { analysis: Some("corroded pipe joint".to_string()) },
            ImageSummary { analysis: None },
        ];
        let prompt = analysis_prompt("leak", &images, None, noon_in_july());

        assert!(prompt.contains("2 image(s)"));
        assert!(prompt.contains("corroded pipe joint, Image uploaded"));
        assert!(prompt.contains("User Location: Not specified"));
    }

    #[test]
    fn matching_prompt_enumerates_workers_verbatim() {
        let prompt = matching_prompt(
            &sample_problem(),
            &[sample_worker()],
            Some("San Francisco"),
            &MatchPreferences::default(),
        );

        assert!(prompt.contains("Worker ID: w2"));
        assert!(prompt.contains("Rating: 4.7/5.0 (203 reviews)"));
        assert!(prompt.contains("Hourly Rate: $75"));
        assert!(prompt.contains("Quality Priority: Balanced"));
        assert!(prompt.contains("Only reference worker IDs"));
    }

    #[test]
    fn pricing_prompt_embeds_market_and_guidelines() {
        let market = MarketContext {
            local_demand: Some("High".to_string()),
            weather_impact: None,
        };
        let prompt = pricing_prompt(
            &sample_worker(),
            &sample_problem(),
            2.0,
            &market,
            noon_in_july(),
        );

        assert!(prompt.contains("Base Hourly Rate: $75/hour"));
        assert!(prompt.contains("Plumber (90% confidence)"));
        assert!(prompt.contains("Season: Summer"));
        assert!(prompt.contains("Day of Week: Monday"));
        assert!(prompt.contains("Time of Day: Afternoon"));
        assert!(prompt.contains("Local Demand: High"));
        assert!(prompt.contains("Weather Impact: None"));
        assert!(prompt.contains("25-50% premium"));
    }

    #[test]
    fn narrative_prompts_request_plain_text() {
        assert!(clarification_prompt("help").contains("not JSON"));
        assert!(no_match_prompt(&sample_problem()).contains("not JSON"));
    }

    #[test]
    fn no_match_prompt_handles_empty_trades() {
        let mut problem = sample_problem();
        problem.trades.clear();
        problem.summary.clear();

        let prompt = no_match_prompt(&problem);
        assert!(prompt.contains("a home repair problem"));
        assert!(prompt.contains("Home repair issue"));
        assert!(prompt.contains("Identified trades needed: Unknown"));
    }

    #[test]
    fn seasons_cover_the_year() {
        let at = |month| Utc.with_ymd_and_hms(2025, month, 15, 0, 0, 0).unwrap();
        assert_eq!(season_for(at(1)), "Winter");
        assert_eq!(season_for(at(4)), "Spring");
        assert_eq!(season_for(at(7)), "Summer");
        assert_eq!(season_for(at(10)), "Fall");
        assert_eq!(season_for(at(12)), "Winter");
    }

    #[test]
    fn time_of_day_buckets() {
        let at = |hour| Utc.with_ymd_and_hms(2025, 7, 14, hour, 0, 0).unwrap();
        assert_eq!(time_of_day_for(at(7)), "Morning");
        assert_eq!(time_of_day_for(at(13)), "Afternoon");
        assert_eq!(time_of_day_for(at(18)), "Evening");
        assert_eq!(time_of_day_for(at(23)), "Night");
        assert_eq!(time_of_day_for(at(3)), "Night");
    }
}
