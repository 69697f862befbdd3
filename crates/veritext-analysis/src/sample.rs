//! Built-in sample document for trying the detector

/// An essay on global warming with a mix of plain and stock AI phrasing
pub const SAMPLE_TEXT: &str = r#"Global Warming: A Warning Signal for Our Future

In recent years, "global warming" has become more than a term in textbooks—it is something we experience every day. From record-breaking heatwaves and frequent heavy rainfall to longer summers, the impact of climate change is now visible across the world. The World Meteorological Organization (WMO) has warned that within the next five years, the world is highly likely to cross the 1.5°C warming threshold, meaning extreme weather events will become even more intense and unpredictable.

The main cause of global warming is the large amount of greenhouse gases—such as carbon dioxide and methane—released from burning fossil fuels. These gases act like a "heat-trapping blanket" around the Earth, preventing heat from escaping into space and causing temperatures to rise year after year. Although global warming may seem like "just hotter weather," the consequences are far more complex.

For Taiwan, the effects are especially evident. Longer summers bring more days of extreme heat, which is dangerous for vulnerable groups such as the elderly and children. Warmer ocean temperatures strengthen typhoons, making them more destructive. Heavy rain and sudden downpours occur more frequently, increasing flooding risks in coastal and low-lying areas. Even agriculture and fisheries face challenges as crop seasons shift and marine environments change.

However, global warming is not an irreversible path. We still have the opportunity to slow down its progression and buy more time for the planet. Some key actions include:

Reducing reliance on fossil fuels by promoting renewable energy and improving energy efficiency.

Green transportation such as public transit, electric vehicles, walking, and cycling.

Changing electricity-use habits, like turning off unused devices and choosing energy-saving appliances.

Government and corporate action, including carbon pricing, climate policies, and building climate-resilient cities.

Most importantly, raising climate awareness among the public is crucial. Global warming is not one person's responsibility, but every individual's choices can drive meaningful change.

Earth is our only home. Faced with an accelerating warming trend, now is the best time to act. Even small changes in daily life can help cool our planet and secure a more hopeful future for the next generation."#;
