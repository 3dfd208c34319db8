// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::info;
use url::Url;

use crate::domain::models::route::Route;
use crate::domain::models::site_config::ChangeFrequency;
use crate::utils::errors::SitemapError;

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// 计算路由在站点地图中的优先级
///
/// 根路由为 1.0，其余路由每多一级深度降低 0.2，最低 0.3
pub fn calculate_priority(route: &Route) -> f64 {
    if route.is_index() {
        return 1.0;
    }
    let depth = route.depth() as f64;
    (1.0 - 0.2 * depth).max(0.3)
}

/// 拼接路由的绝对地址
fn route_location(domain: &str, route: &Route) -> String {
    let path = format!("/{}", route.as_str());
    match Url::parse(domain).and_then(|base| base.join(&path)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", domain.trim_end_matches('/'), path),
    }
}

async fn write_text_element<W: AsyncWrite + Unpin>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), SitemapError> {
    writer
        .write_event_async(Event::Start(BytesStart::new(name)))
        .await?;
    writer
        .write_event_async(Event::Text(BytesText::new(text)))
        .await?;
    writer
        .write_event_async(Event::End(BytesEnd::new(name)))
        .await?;
    Ok(())
}

/// 逐条写出站点地图，返回底层写入器
///
/// 条目按路由顺序直接编码到 `sink`，不会在内存中拼出整份文档
async fn write_sitemap<W: AsyncWrite + Unpin>(
    sink: W,
    routes: &[Route],
    domain: &str,
    change_frequency: ChangeFrequency,
) -> Result<W, SitemapError> {
    let mut writer = Writer::new(sink);

    writer
        .write_event_async(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .await?;
    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event_async(Event::Start(urlset)).await?;

    for route in routes {
        writer
            .write_event_async(Event::Start(BytesStart::new("url")))
            .await?;
        write_text_element(&mut writer, "loc", &route_location(domain, route)).await?;
        write_text_element(&mut writer, "changefreq", change_frequency.as_str()).await?;
        write_text_element(
            &mut writer,
            "priority",
            &format!("{:.1}", calculate_priority(route)),
        )
        .await?;
        writer
            .write_event_async(Event::End(BytesEnd::new("url")))
            .await?;
    }

    writer
        .write_event_async(Event::End(BytesEnd::new("urlset")))
        .await?;

    Ok(writer.into_inner())
}

/// 渲染站点地图 XML 到字符串
///
/// # 参数
///
/// * `routes` - 路由列表，按输入顺序输出
/// * `domain` - 站点域名
/// * `change_frequency` - 所有条目共用的更新频率
pub async fn render_sitemap(
    routes: &[Route],
    domain: &str,
    change_frequency: ChangeFrequency,
) -> Result<String, SitemapError> {
    let bytes = write_sitemap(Vec::new(), routes, domain, change_frequency).await?;
    String::from_utf8(bytes).map_err(|e| {
        SitemapError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// 生成站点地图文件
///
/// 条目经缓冲写入器流式写入文件，最后统一刷新
///
/// # 参数
///
/// * `routes` - 路由列表
/// * `domain` - 站点域名
/// * `change_frequency` - 更新频率
/// * `output_path` - 输出文件路径
///
/// # 返回值
///
/// * `Ok(())` - 文件已完整写入
/// * `Err(SitemapError)` - 编码或写入失败
pub async fn generate_sitemap(
    routes: &[Route],
    domain: &str,
    change_frequency: ChangeFrequency,
    output_path: &Path,
) -> Result<(), SitemapError> {
    let file = File::create(output_path).await?;
    let mut sink = write_sitemap(BufWriter::new(file), routes, domain, change_frequency).await?;
    sink.flush().await?;
    info!("Sitemap has been successfully created!");
    Ok(())
}
