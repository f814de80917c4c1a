// Module prompts
// Roles, question flows, warm-up openers and draft instructions
//
// Everything here is a pure function of `ModuleType`.

use super::module::ModuleType;
use super::COACHING_PERSONA;

/// Short role title the coach adopts for a module.
pub fn role(module: ModuleType) -> &'static str {
    match module {
        ModuleType::Story => "Story Coach",
        ModuleType::Solution => "Solution Architect",
        ModuleType::Success => "Success Strategist",
    }
}

/// One-line module description used in headers and opening turns.
pub fn focus_description(module: ModuleType) -> &'static str {
    match module {
        ModuleType::Story => "Clarify why you exist and who you're really here to serve.",
        ModuleType::Solution => {
            "Design the offers and experiences that actually help your people win."
        }
        ModuleType::Success => "Define what a home run looks like, for them and for you.",
    }
}

const STORY_QUESTIONS: [&str; 7] = [
    "Why are you doing this business or project? What's the deeper reason behind it?",
    "What personal experiences, frustrations, or wins led you here?",
    "If this business fully worked, what would it change for you and your family?",
    "Who is your primary audience? Describe one person in as much detail as you can.",
    "What are they dealing with day to day? What's hard for them?",
    "What do they secretly wish were true 6-12 months from now?",
    "Where do they usually hang out (online/offline)? Who do they already trust?",
];

const SOLUTION_QUESTIONS: [&str; 9] = [
    "In your own words, what does your audience say they want?",
    "What do they really need, even if they don't have language for it yet?",
    "What do you do or know that could help them get that?",
    "If you had to help one ideal client from A to B in 4-6 steps, what would those steps be?",
    "What format do you see this solution taking right now? (1:1, group, course, service, product)",
    "Realistically, how much time and energy can you invest each week to deliver this?",
    "How do people typically find you (or how do you want them to)?",
    "What happens between 'I saw you' and 'I'm in'?",
    "What's the first quick win you want them to experience?",
];

const SUCCESS_QUESTIONS: [&str; 8] = [
    "Imagine your ideal client 6-12 months after working with you or using your solution. What's different in their life or work?",
    "How would they describe that result in their own words?",
    "What would make them say, 'This was an absolute home run'?",
    "What are 3-5 signs you could point to that show this is working?",
    "What could you track monthly that would tell you things are getting better?",
    "What could you ask your clients at the end to capture their story?",
    "In the next 90 days, what would make the biggest difference?",
    "What feels realistic, given your time and energy?",
];

/// Fixed question list for a module, asked in order by the fallback path.
pub fn question_list(module: ModuleType) -> &'static [&'static str] {
    match module {
        ModuleType::Story => &STORY_QUESTIONS,
        ModuleType::Solution => &SOLUTION_QUESTIONS,
        ModuleType::Success => &SUCCESS_QUESTIONS,
    }
}

/// Module-specific goals appended to the shared coaching persona.
fn module_goals(module: ModuleType) -> &'static str {
    match module {
        ModuleType::Story => {
            "## Module Goals\n\
             Help the user articulate why they are doing this work and exactly who it is for. \
             By the end you should be able to write a Brand Story, an Ideal Client Profile and \
             a one-sentence Core Message."
        }
        ModuleType::Solution => {
            "## Module Goals\n\
             Help the user define what their audience wants, what they provide, and how clients \
             get it. By the end you should be able to write a Value Proposition, an Offer \
             Overview, a Customer Journey Map and a 4-6 step Delivery Framework."
        }
        ModuleType::Success => {
            "## Module Goals\n\
             Help the user define what success looks like for their clients and their business. \
             By the end you should be able to write a HomeRun Outcome Statement, 3-5 Success \
             Metrics and a realistic 90-Day Action Plan."
        }
    }
}

/// Coaching persona plus module goals; the text sent on the system channel.
pub fn system_prompt(module: ModuleType) -> String {
    format!("{}\n\n{}", COACHING_PERSONA.trim(), module_goals(module))
}

/// Greeting used when a session starts with a warm-up phase.
pub fn warmup_prompt(module: ModuleType) -> String {
    let role = role(module);
    let description = focus_description(module);

    match module {
        ModuleType::Story => format!(
            "Hi! I'm your {role}. In this module, we'll clarify your story: why you're doing this \
             and who it's for. We'll end with a clear brand story and a simple description of your \
             ideal customer.\n\n{description}\n\nReady to get started? Let's begin with \
             understanding your WHY."
        ),
        ModuleType::Solution => format!(
            "Hi! I'm your {role}. In this module, we'll define the solution you bring: what your \
             audience wants, what you provide, and how they get it. We'll end with a clear value \
             proposition, a draft offer, and a simple customer journey.\n\n{description}\n\n\
             Ready to design your solution?"
        ),
        ModuleType::Success => format!(
            "Hi! I'm your {role}. In this module, we'll define what success looks like for your \
             clients and for your business, and turn that into a practical action plan.\n\n\
             {description}\n\nLet's start by imagining what a home run looks like for your ideal \
             client."
        ),
    }
}

/// Structured synthesis instructions describing the sections of the final draft.
pub fn draft_instructions(module: ModuleType) -> &'static str {
    match module {
        ModuleType::Story => {
            "Based on our entire conversation, please create a comprehensive draft that includes:\n\n\
             1. **Brand Story**: A clear, compelling narrative that explains why you're doing this \
             business and what drives you\n\
             2. **Ideal Client Profile**: A detailed description of your primary audience, including:\n   \
             - Who they are (demographics, situation)\n   \
             - What challenges they face daily\n   \
             - What they secretly wish were true\n   \
             - Where they hang out and who they trust\n\
             3. **Core Message**: One sentence that connects your why to the people you serve\n\n\
             Please synthesize all the information from our conversation into a well-structured, \
             actionable draft. Make it specific and personal, not generic."
        }
        ModuleType::Solution => {
            "Based on our entire conversation, please create a comprehensive draft that includes:\n\n\
             1. **Value Proposition**: A clear statement of what you offer and why it matters\n\
             2. **Offer Overview**: Details about your main offer including format, who it's for, \
             and the main promise\n\
             3. **Customer Journey Map**: The steps from \"I saw you\" to \"I'm in\" and beyond\n\
             4. **Delivery Framework**: The 4-6 key steps that help a client go from A to B\n\n\
             Please synthesize all the information from our conversation into a well-structured, \
             actionable draft. Make it specific and practical."
        }
        ModuleType::Success => {
            "Based on our entire conversation, please create a comprehensive draft that includes:\n\n\
             1. **HomeRun Outcome Statement**: What success looks like for your ideal client 6-12 \
             months after working with you\n\
             2. **Success Metrics**: 3-5 tangible signs that show things are working, plus monthly \
             tracking suggestions\n\
             3. **90-Day Action Plan**: Realistic, actionable projects and tasks for the next 90 days\n\n\
             Please synthesize all the information from our conversation into a well-structured, \
             actionable draft. Make it specific and measurable."
        }
    }
}

/// Reflection line a coach can use when reviewing a draft with the user.
pub fn reflection_prompt(module: ModuleType) -> &'static str {
    match module {
        ModuleType::Story => {
            "Let me reflect back what I'm hearing. Does this feel true? What would you tweak?"
        }
        ModuleType::Solution => {
            "Here's how I'd summarize your solution. Does this capture what you're building?"
        }
        ModuleType::Success => {
            "Here's what I hear success looking like for you. Does this align with what you want?"
        }
    }
}
