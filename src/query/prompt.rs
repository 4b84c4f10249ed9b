/// Reference works the model should draw prescriptions from, in preference order
pub const REFERENCE_WORKS: &[&str] = &[
    "《金匮要略》",
    "《伤寒杂病论》（伤寒论）",
    "《千金药方》（或千金翼方）",
    "《黄帝内经》",
];

/// Build the instruction payload for one symptom description
pub fn consultation_prompt(query: &str) -> String {
    let works: String = REFERENCE_WORKS
        .iter()
        .enumerate()
        .map(|(i, work)| format!("{}. **{}**\n", i + 1, work))
        .collect();

    format!(
        "你是一位精通中国历代医学经典的中医专家。\n\
         用户的输入是：{query}。\n\n\
         请根据用户的描述，进行中医辨证分析，并从以下四部经典著作中寻找最对症的方剂：\n\
         {works}\
         （内经方剂较少，若有经典对应亦可引用，以药方为主的书籍优先）\n\n\
         **任务要求：**\n\
         1. **辨证分析**：首先分析病机（如：表证、里证、寒热虚实）。\n\
         2. **多方推荐**：找出 **2-3 个** 针对该症状的经典方剂，尽量涵盖不同书籍的思路。\
         如果只能找到一个完全对症的，也可以只返回一个。\n\
         3. **药材详情**：每一味药都要提供**道地产地**以及**选购注意事项**（色泽、气味、质地等鉴别要点）。\n\
         4. **异同对比**：对比这几个方剂的侧重点与适用体质。\n\
         5. **最终推荐**：给出一个综合建议。\n\n\
         **内容风格要求：**\n\
         - **translation（译文）**：使用极度通俗、口语化的大白话。\n\
         - **sourceChapter**：格式为“《书籍名》·章节名”。\n\n\
         请返回标准的 JSON 格式，严格按照 Schema 定义。\n\
         确保内容专业、准确、古文引用无误。\n\
         所有输出请使用简体中文。\n"
    )
}
