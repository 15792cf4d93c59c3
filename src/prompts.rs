//! Prompt templates for the copy and image calls.

use crate::models::{Length, Platform};

pub const BRAND_NAME: &str = "RealPrize.com";

const COPY_RULES: &str = "**PART 1: SOCIAL COPY RULES (STRICT):**
1. **FORBIDDEN TERMS:** Never use \"Gold Coins\", \"GC\", \"Sweepstakes Coins\", or \"SC\". Use \"Rewards\" or \"Prizes\".
2. **NO GAMBLING JARGON:** No \"bet\", \"wager\", \"gamble\", \"casino\", \"slots\".
3. **NO META-ENGAGEMENT BAIT:** NEVER use \"Comment\", \"Share\", \"Tag\", \"Like\", \"Follow\".
4. **NO WEBSITE MENTIONS:** Never write \"Visit RealPrize.com\" or \"Link in bio\".";

const BRIEF_RULES: &str = "**PART 2: ASANA BRIEF RULES (FOR DESIGNERS):**
1. **Description**: Concise overview of the campaign's purpose.
2. **Look & Feel**: Explain what needs to be in the image in simple, plain English terms.
   DO NOT use jargon like \"3D\" or \"Claymorphism\". Describe objects, layout, and colors (Royal Blue, Bright Red, Shiny Gold).
3. **Messaging Hierarchy**: State the order of importance for elements (1. Primary Subject, 2. Secondary Context, 3. Logo/Mascot).

You MUST return a valid JSON object.";

const BRAND_LANGUAGE: &str = "**REALPRIZE BRAND LANGUAGE (Mandatory Aesthetic):**
- **STYLE:** \"Claymorphism\" - Everything is premium, high-gloss, soft-touch 3D.
- **VISUALS:** Soft, rounded edges, cinematic lighting, vibrant global illumination.
- **COLORS:** Royal Blue and Bright Red dominance. High-shine Glossy Gold for accents.
- **CORE ELEMENTS:**
  1. **The Mascot:** Always feature the \"RealPrize Blue Cube\" (rounded blue cube with a simple, friendly face).
  2. **The Props:** Include piles of oversized, reflective 3D gold coins as decorative elements.";

/// Refinement context for a tweak: the instruction and the copy being reworked.
#[derive(Debug, Clone, Copy)]
pub struct Refinement<'a> {
    pub instruction: &'a str,
    pub previous_content: &'a str,
}

pub fn copy_system_instruction(copy_topic: &str, length: Length, refinement: Option<Refinement<'_>>) -> String {
    let mut prompt = format!(
        "You are the Lead Social Media Strategist for **{BRAND_NAME}**.\n\
Task: Create a social campaign for: \"{copy_topic}\" and provide a designer brief.\n\n\
{COPY_RULES}\n\
5. **STRUCTURE:** Exactly {} sentences. Single CTA. Ends with a question.\n\n",
        length.sentences()
    );
    if let Some(refinement) = refinement.filter(|r| !r.instruction.trim().is_empty() && !r.previous_content.trim().is_empty()) {
        prompt.push_str(&format!(
            "**REFINEMENT REQUEST (PRIORITY):**\n\
The user is tweaking a previous result.\n\
PREVIOUS CONTENT: \"{}\"\n\
INSTRUCTION: \"{}\"\n\n\
YOUR GOAL: Modify the content as requested in the INSTRUCTION. If the instruction asks for specific changes \
(shorter, funnier, more focus on X), prioritize that above all else while staying within the core {BRAND_NAME} brand rules.\n\n",
            refinement.previous_content.trim(),
            refinement.instruction.trim()
        ));
    }
    prompt.push_str(BRIEF_RULES);
    prompt
}

pub fn copy_user_content(
    platform: Platform,
    copy_topic: &str,
    visual_concept: &str,
    refinement: Option<&str>,
) -> String {
    let mut content = format!(
        "Platform: {platform}\nTopic: \"{copy_topic}\"\nVisual Concept: \"{visual_concept}\""
    );
    if let Some(instruction) = refinement.map(str::trim).filter(|value| !value.is_empty()) {
        content.push_str(&format!("\nUser Refinement Instruction: \"{instruction}\""));
    }
    content
}

pub fn image_prompt(visual_concept: &str, has_reference: bool) -> String {
    let reference_note = if has_reference {
        "A REFERENCE IMAGE is provided. Use it ONLY for its SPATIAL CONCEPT or COMPOSITION. Do NOT copy its objects or style. \
You must generate a BRAND NEW 3D SCENE from scratch using the RealPrize brand language."
    } else {
        "No reference image provided. Create an original 3D masterpiece based on the visual concept."
    };
    format!(
        "You are a World-Class 3D Artist for \"{BRAND_NAME}\".\n\
Task: Generate a completely ORIGINAL, high-gloss 3D promotional graphic based on this visual concept: \"{visual_concept}\".\n\n\
**CONCEPTUAL REFERENCE ONLY:**\n{reference_note}\n\n\
{BRAND_LANGUAGE}\n\n\
**TOPIC-SPECIFIC LOGIC:**\n\
- **PRIMARY FOCUS:** The visual concept is \"{visual_concept}\". This dictates the core subject of your NEW render.\n\
- **IF TOPIC IS \"GIFT\":** The hero of YOUR render must be a luxurious 3D gift box with a silk gold ribbon.\n\
- **IF TOPIC IS A GAME/PUZZLE:** Render a high-quality 3D platform following the reference's composition concept, \
but using our 3D objects (cards, symbols, or cubes).\n\
- **STRICT:** Do not \"tweak\" the reference. Create a new image that speaks the visual language of {BRAND_NAME}.\n\n\
**TECHNICAL:**\n- Clean composition. High-resolution feel. No text in the image."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instruction_carries_sentence_count() {
        let prompt = copy_system_instruction("daily puzzle", Length::Five, None);
        assert!(prompt.contains("Exactly 5 sentences"));
        assert!(prompt.contains("\"daily puzzle\""));
        assert!(!prompt.contains("REFINEMENT REQUEST"));
    }

    #[test]
    fn refinement_block_needs_instruction_and_previous_content() {
        let with_both = copy_system_instruction(
            "gift",
            Length::Two,
            Some(Refinement {
                instruction: "make it shorter",
                previous_content: "Old copy?",
            }),
        );
        assert!(with_both.contains("PREVIOUS CONTENT: \"Old copy?\""));
        assert!(with_both.contains("INSTRUCTION: \"make it shorter\""));

        let blank_instruction = copy_system_instruction(
            "gift",
            Length::Two,
            Some(Refinement {
                instruction: "  ",
                previous_content: "Old copy?",
            }),
        );
        assert!(!blank_instruction.contains("REFINEMENT REQUEST"));
    }

    #[test]
    fn user_content_lists_inputs() {
        let content = copy_user_content(Platform::Twitter, "gift", "gift box", Some("funnier"));
        assert_eq!(
            content,
            "Platform: Twitter/X\nTopic: \"gift\"\nVisual Concept: \"gift box\"\nUser Refinement Instruction: \"funnier\""
        );
        assert!(!copy_user_content(Platform::Reddit, "a", "b", None).contains("Refinement"));
    }

    #[test]
    fn image_prompt_mentions_reference_only_when_present() {
        assert!(image_prompt("gold cube", true).contains("A REFERENCE IMAGE is provided"));
        assert!(image_prompt("gold cube", false).contains("No reference image provided"));
    }
}
