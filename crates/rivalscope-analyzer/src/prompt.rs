//! Instruction template for the analysis request.
//!
//! The model is not schema-constrained, so the JSON shape spelled out here is
//! the only thing holding its reply to the [`CompetitorAnalysis`] contract.
//! Keep the field names in sync with `rivalscope_core::analysis`.
//!
//! [`CompetitorAnalysis`]: rivalscope_core::CompetitorAnalysis

use rivalscope_core::ScrapedPage;

const SYSTEM_PROMPT: &str = "You are an expert business analyst specializing in competitive research. \
Give detailed, accurate analysis of websites and their competitors. \
Reply with a single valid JSON object and nothing else: no markdown, no code fences, no commentary. \
Name real companies that exist today; never use generic placeholders such as \"Company A\". \
When recommending partnerships, name the company, its website and the concrete reason it fits. \
For offerings, describe competitor products with specific features, pricing and limitations. \
For social media, compare the main company with every identified competitor platform by platform. \
For recent launches, give the company, a specific date, a description and a source URL.";

const FULL_SCHEMA: &str = r#"{
  "websiteUrl": string,
  "summary": string,
  "competitors": [{
    "name": string,
    "url": string,
    "description": string,
    "strengths": string[],
    "weaknesses": string[],
    "importantUrls": [{ "title": string, "url": string, "description": string }]
  }],
  "pricing": {
    "summary": string,
    "competitors": [{
      "name": string,
      "plans": [{ "name": string, "price": string, "features": string[] }]
    }]
  },
  "socialMedia": {
    "summary": string,
    "mainCompany": {
      "name": string,
      "platforms": [{
        "name": string,
        "url": string,
        "followers": number,
        "engagement": number,
        "postFrequency": string,
        "topPosts": [{ "title": string, "engagement": number, "url": string }]
      }]
    },
    "competitorProfiles": [{
      "name": string,
      "platforms": [{
        "name": string,
        "url": string,
        "followers": number,
        "engagement": number,
        "postFrequency": string,
        "strategy": string
      }]
    }],
    "platformComparisons": [{
      "platform": string,
      "companies": [{
        "name": string,
        "followers": number,
        "engagement": number,
        "postFrequency": string,
        "contentType": string,
        "strengths": string[],
        "weaknesses": string[]
      }]
    }],
    "insights": string[]
  },
  "partnerships": {
    "summary": string,
    "partnerships": [{
      "company": string,
      "type": string,
      "description": string,
      "benefits": string[]
    }],
    "recommendations": [{
      "company": string,
      "website": string,
      "type": string,
      "rationale": string,
      "potentialBenefits": string[]
    }]
  },
  "offerings": {
    "summary": string,
    "offerings": [{
      "name": string,
      "description": string,
      "uniqueSellingPoints": string[],
      "competitors": [{
        "name": string,
        "hasFeature": boolean,
        "notes": string,
        "offeringDetails": {
          "description": string,
          "keyFeatures": string[],
          "uniqueAspects": string[],
          "limitations": string[]
        }
      }]
    }],
    "competitorUniqueOfferings": [{
      "competitor": string,
      "offerings": [{
        "name": string,
        "description": string,
        "keyFeatures": string[],
        "targetAudience": string
      }]
    }],
    "trends": string[],
    "gaps": string[]
  },
  "recentLaunches": [{
    "company": string,
    "launchType": string,
    "name": string,
    "date": string (YYYY-MM-DD when known),
    "description": string,
    "url": string,
    "impact": string,
    "targetAudience": string
  }]
}"#;

const MINIMAL_SCHEMA: &str = r#"{
  "websiteUrl": string,
  "summary": string,
  "competitors": [{
    "name": string,
    "url": string,
    "description": string,
    "strengths": string[],
    "weaknesses": string[]
  }]
}"#;

const FULL_TOPICS: &str = "\
1. Similar companies and direct competitors
2. Their pricing strategies and plans
3. Social media presence and strategy, compared platform by platform
4. Partnerships and integrations, plus recommended new partners
5. Product and service offerings, including gaps and trends
6. Recent product, service or partnership launches by competitors";

const MINIMAL_TOPICS: &str = "\
1. A short summary of what the company does
2. Its main competitors, with strengths and weaknesses";

/// Output shape requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisSchema {
    /// All six analysis dimensions.
    #[default]
    Full,
    /// Summary and competitors only. Faster, used when latency matters more
    /// than depth.
    Minimal,
}

impl AnalysisSchema {
    fn topics(self) -> &'static str {
        match self {
            AnalysisSchema::Full => FULL_TOPICS,
            AnalysisSchema::Minimal => MINIMAL_TOPICS,
        }
    }

    fn schema(self) -> &'static str {
        match self {
            AnalysisSchema::Full => FULL_SCHEMA,
            AnalysisSchema::Minimal => MINIMAL_SCHEMA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Builds the canonical six-dimension prompt for `page`.
#[must_use]
pub fn build_prompt(page: &ScrapedPage, url: &str) -> PromptPair {
    build_prompt_with_schema(page, url, AnalysisSchema::Full)
}

#[must_use]
pub fn build_prompt_with_schema(
    page: &ScrapedPage,
    url: &str,
    schema: AnalysisSchema,
) -> PromptPair {
    let user = format!(
        "Analyze the following website and provide detailed information about:\n\
         {topics}\n\n\
         Here is the scraped content from {url}:\n\n\
         {transcript}\n\
         Respond with one JSON object matching this schema exactly. Use \"{url}\" as websiteUrl. \
         Use empty arrays when you have nothing to report; do not omit sections.\n\
         {schema}",
        topics = schema.topics(),
        transcript = page.transcript(),
        schema = schema.schema(),
    );

    PromptPair {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}
