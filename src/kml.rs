//! Very simple functions for producing KML files of clustered markers.
//!
//! Only the handful of elements needed to drop one pin per cluster are supported, and it is a
//! streaming API, so the user is responsible for closing all tags.

use crate::{cluster::ClusterList, ErrorMapResult};
use std::{
    fmt::Write as _,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

const FOOTER: &str = concat!(r#"</Document>"#, "\n", r#"</kml>"#, "\n");

pub struct KmlFile {
    out: BufWriter<File>,
    finished: bool,
}

impl KmlFile {
    /// Create the file and write the document header.
    pub fn new<P: AsRef<Path>>(pth: P) -> ErrorMapResult<Self> {
        let p = pth.as_ref();

        let f = std::fs::File::create(p)?;
        let mut new = KmlFile {
            out: BufWriter::new(f),
            finished: false,
        };
        new.start_document()?;
        Ok(new)
    }

    /// Close the document and flush it to disk, reporting any failure to do so.
    ///
    /// Dropping a [KmlFile] without calling this still closes the document, but errors are lost.
    pub fn finish(mut self) -> ErrorMapResult<()> {
        self.finished = true;
        self.out.write_all(FOOTER.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl KmlWriter for KmlFile {
    fn output(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}

impl Drop for KmlFile {
    fn drop(&mut self) {
        if !self.finished {
            self.finish_document();
            let _ = self.out.flush();
        }
    }
}

pub trait KmlWriter {
    fn output(&mut self) -> &mut dyn Write;

    /// Put the header out.
    fn start_document(&mut self) -> ErrorMapResult<()> {
        const HEADER: &str = concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "\n",
            r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#,
            "\n",
            "<Document>\n"
        );

        self.output().write_all(HEADER.as_bytes())?;

        Ok(())
    }

    /// Close a document.
    fn finish_document(&mut self) {
        let _ = self.output().write_all(FOOTER.as_bytes());
    }

    /// Write a description element to the file.
    ///
    /// The text goes in a CDATA section, any `]]>` inside it is split across two sections.
    fn write_description(&mut self, description: &str) -> ErrorMapResult<()> {
        writeln!(
            self.output(),
            "<description><![CDATA[{}]]></description>",
            description.replace("]]>", "]]]]><![CDATA[>")
        )?;
        Ok(())
    }

    /// Start a KML folder.
    fn start_folder(&mut self, name: Option<&str>, is_open: bool) -> ErrorMapResult<()> {
        self.output().write_all("<Folder>\n".as_bytes())?;

        if let Some(name) = name {
            writeln!(self.output(), "<name>{}</name>", escape(name))?;
        }

        if is_open {
            self.output().write_all("<open>1</open>\n".as_bytes())?;
        }

        Ok(())
    }

    /// Close out a folder element
    fn finish_folder(&mut self) -> ErrorMapResult<()> {
        writeln!(self.output(), "</Folder>")?;
        Ok(())
    }

    /// Start a placemark element.
    fn start_placemark(
        &mut self,
        name: Option<&str>,
        description: Option<&str>,
        style_url: Option<&str>,
    ) -> ErrorMapResult<()> {
        writeln!(self.output(), "<Placemark>")?;

        if let Some(name) = name {
            writeln!(self.output(), "<name>{}</name>", escape(name))?;
        }

        if let Some(description) = description {
            self.write_description(description)?;
        }

        if let Some(style_url) = style_url {
            writeln!(self.output(), "<styleUrl>{}</styleUrl>", style_url)?;
        }

        Ok(())
    }

    /// Close out a placemark element.
    fn finish_placemark(&mut self) -> ErrorMapResult<()> {
        writeln!(self.output(), "</Placemark>")?;
        Ok(())
    }

    /// Write a style with a single icon in it.
    fn create_icon_style(
        &mut self,
        style_id: &str,
        icon_url: Option<&str>,
        scale: f64,
    ) -> ErrorMapResult<()> {
        writeln!(self.output(), "<Style id=\"{}\">", style_id)?;
        writeln!(self.output(), "<IconStyle>")?;

        if scale > 0.0 {
            writeln!(self.output(), "<scale>{}</scale>", scale)?;
        } else {
            writeln!(self.output(), "<scale>1</scale>")?;
        }

        if let Some(icon_url) = icon_url {
            writeln!(self.output(), "<Icon><href>{}</href></Icon>", icon_url)?;
        }

        writeln!(self.output(), "</IconStyle>")?;
        writeln!(self.output(), "</Style>")?;
        Ok(())
    }

    /// Write out a KML Point element
    fn create_point(&mut self, lat: f64, lon: f64, z: f64) -> ErrorMapResult<()> {
        writeln!(
            self.output(),
            "<Point>\n<coordinates>{},{},{}</coordinates>\n</Point>",
            lon,
            lat,
            z
        )?;
        Ok(())
    }

    /// Write a folder with one placemark per cluster, placed at the cluster centroid.
    ///
    /// The placemark is named with the number of markers in the cluster and the description
    /// lists the member titles.
    fn write_cluster_list(
        &mut self,
        list: &ClusterList,
        style_url: Option<&str>,
    ) -> ErrorMapResult<()> {
        let mut folder_name = String::new();
        write!(
            &mut folder_name,
            "{} clusters ({:.3} km)",
            list.len(),
            list.radius_km
        )?;
        self.start_folder(Some(&folder_name), true)?;

        let mut name = String::new();
        let mut description = String::new();
        for clust in &list.clusters {
            name.clear();
            write!(&mut name, "{}", clust.len())?;

            description.clear();
            for m in clust.members() {
                match m.error_id.as_deref() {
                    Some(id) => write!(&mut description, "{} ({})<br/>", m.title, id)?,
                    None => write!(&mut description, "{}<br/>", m.title)?,
                }
            }

            let centroid = clust.centroid();
            self.start_placemark(Some(&name), Some(&description), style_url)?;
            self.create_point(centroid.latitude, centroid.longitude, 0.0)?;
            self.finish_placemark()?;
        }

        self.finish_folder()
    }
}

/// Escape the characters that are not allowed in XML text.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
