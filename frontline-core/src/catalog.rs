//! Built-in platform catalog
//!
//! The list served by `GET /platforms`. Listing is a display concern: a
//! platform may appear here before an adapter for it is registered.

use crate::platform::{Category, Platform};

/// All platforms known to the front end, in display order
pub fn builtin_platforms() -> Vec<Platform> {
    vec![
        // Hot-search boards
        Platform::new("weibo", "微博热搜", Category::Hot),
        Platform::new("baidu", "百度热搜", Category::Hot),
        Platform::new("douyin", "抖音热搜", Category::Hot),
        Platform::new("toutiao", "今日头条", Category::Hot),
        Platform::new("zhihu", "知乎热榜", Category::Hot),
        Platform::new("kuaishou", "快手热搜", Category::Hot),
        // Tech
        Platform::new("github", "GitHub趋势", Category::Tech),
        Platform::new("_36kr", "36氪", Category::Tech),
        Platform::new("ithome", "IT之家", Category::Tech),
        Platform::new("solidot", "奇客Solidot", Category::Tech),
        Platform::new("v2ex", "V2EX", Category::Tech),
        Platform::new("coolapk", "酷安", Category::Tech),
        Platform::new("juejin", "稀土掘金", Category::Tech),
        Platform::new("sspai", "少数派", Category::Tech),
        Platform::new("csdn", "CSDN", Category::Tech),
        Platform::new("nowcoder", "牛客网", Category::Tech),
        Platform::new("pcbeta_windows", "远景论坛", Category::Tech),
        Platform::new("_51cto", "51CTO", Category::Tech),
        Platform::new("kaopu", "靠谱", Category::Tech),
        // Finance
        Platform::new("gelonghui", "格隆汇", Category::Finance),
        Platform::new("wallstreetcn_live", "华尔街见闻直播", Category::Finance),
        Platform::new("wallstreetcn_news", "华尔街见闻新闻", Category::Finance),
        Platform::new("wallstreetcn_hot", "华尔街见闻热榜", Category::Finance),
        Platform::new("hotstock", "雪球热股", Category::Finance).with_component("stock"),
        Platform::new("cls_telegraph", "财联社", Category::Finance),
        Platform::new("jqka", "同花顺要闻", Category::Finance),
        Platform::new("jin10", "金十数据", Category::Finance),
        // Social
        Platform::new("thepaper", "澎湃新闻", Category::Social),
        Platform::new("cankaoxiaoxi", "参考消息", Category::Social),
        Platform::new("zaobao", "联合早报", Category::Social),
        Platform::new("sputniknewscn", "俄罗斯卫星通讯社", Category::Social),
        Platform::new("tieba", "百度贴吧", Category::Social),
        // Entertainment
        Platform::new("douban", "豆瓣热影", Category::Entertainment).with_component("rating"),
        Platform::new("bd_tv", "百度热剧", Category::Entertainment),
        Platform::new("kugou", "酷狗音乐飙升榜", Category::Entertainment),
        Platform::new("qq_music", "QQ音乐流行榜", Category::Entertainment),
        Platform::new("b_hot_search", "哔哩哔哩热搜", Category::Entertainment),
        Platform::new("b_hot_video", "哔哩哔哩视频", Category::Entertainment).with_component("video"),
        Platform::new("b_rank", "哔哩哔哩排行榜", Category::Entertainment).with_component("video"),
        // Sports
        Platform::new("hupu_lol", "英雄联盟比赛", Category::Sports).with_component("match"),
        Platform::new("hupu", "虎扑", Category::Sports),
        // Car
        Platform::new("dcd_hot", "懂车帝热搜", Category::Car),
        Platform::new("dcd_news", "懂车帝资讯", Category::Car),
    ]
}

/// Platforms shown under a category
pub fn platforms_by_category(category: Category) -> Vec<Platform> {
    builtin_platforms()
        .into_iter()
        .filter(|p| p.category == category)
        .collect()
}

/// Find a catalog entry by key
pub fn find_platform(key: &str) -> Option<Platform> {
    builtin_platforms().into_iter().find(|p| p.platform == key)
}
